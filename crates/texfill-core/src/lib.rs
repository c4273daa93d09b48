// SPDX-License-Identifier: AGPL-3.0-or-later
//! texfill core - line assembly, fill and justify engine
//!
//! This crate provides:
//! - A tokenizer for backslash-command markup
//! - A line assembler that fills, justifies and indents paragraphs
//! - Page assemblers that paginate output or collect endnotes
//! - A controller tying them together, with endnotes printed after the text

pub mod command;
pub mod config;
pub mod controller;
pub mod lexer;
pub mod line;
pub mod page;
pub mod parser;
pub mod traits;

use std::io::{Read, Write};

pub use command::Command;
pub use config::{FormatConfig, Settings};
pub use controller::Controller;
pub use lexer::{Lexer, Token};
pub use line::LineAssembler;
pub use page::{PageCollector, PagePrinter};
pub use parser::InputParser;
pub use traits::{Diagnostic, Diagnostics, FormatError, PageSink, Result};

/// Formatted text together with everything reported while producing it
#[derive(Debug)]
pub struct Formatted {
    pub output: String,
    pub diagnostics: Diagnostics,
}

/// Format a whole document held in memory
pub fn format_str(input: &str, settings: &Settings) -> Result<Formatted> {
    let mut controller = Controller::with_settings(Vec::new(), settings);
    let diagnostics = InputParser::new(input, &mut controller).process()?;
    let output = String::from_utf8_lossy(&controller.into_output()).into_owned();
    Ok(Formatted {
        output,
        diagnostics,
    })
}

/// Format a document from `reader`, writing pages to `writer`
pub fn format_reader<R: Read, W: Write>(
    mut reader: R,
    writer: W,
    settings: &Settings,
) -> Result<Diagnostics> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    let mut controller = Controller::with_settings(writer, settings);
    InputParser::new(&input, &mut controller).process()
}
