// SPDX-License-Identifier: AGPL-3.0-or-later
//! Routing of text and commands between main text and endnotes

use std::io::Write;

use tracing::debug;

use crate::command::Command;
use crate::config::Settings;
use crate::line::LineAssembler;
use crate::page::{PageCollector, PagePrinter};
use crate::parser::InputParser;
use crate::traits::{Diagnostics, FormatError, PageSink, Result};

/// Runs `$body` with `$text` bound to whichever assembler receives input
macro_rules! active {
    ($self:ident, $text:ident => $body:expr) => {
        if $self.in_endnote {
            let $text = &mut $self.endnotes;
            $body
        } else {
            let $text = &mut $self.main;
            $body
        }
    };
}

/// Receives tokenizer events and drives the main text and endnote assemblers.
///
/// Main text is printed as it is formatted. Endnotes are formatted into a
/// collector and printed after the main text by [`Controller::close`].
#[derive(Debug)]
pub struct Controller<W: Write> {
    main: LineAssembler<PagePrinter<W>>,
    endnotes: LineAssembler<PageCollector>,
    in_endnote: bool,
    ref_num: usize,
}

impl<W: Write> Controller<W> {
    pub fn new(out: W) -> Self {
        Self::with_settings(out, &Settings::default())
    }

    pub fn with_settings(out: W, settings: &Settings) -> Self {
        Self {
            main: LineAssembler::with_config(PagePrinter::new(out), settings.text.clone()),
            endnotes: LineAssembler::with_config(PageCollector::new(), settings.endnote.clone()),
            in_endnote: false,
            ref_num: 0,
        }
    }

    pub fn add_text(&mut self, text: &str) {
        active!(self, text_out => text_out.add_text(text))
    }

    pub fn end_word(&mut self) -> Result<()> {
        active!(self, text => text.end_word())
    }

    /// A single line break: a word boundary when filling, else a line break
    pub fn add_newline(&mut self) -> Result<()> {
        active!(self, text => {
            if text.fill() {
                text.end_word()
            } else {
                text.new_line()
            }
        })
    }

    pub fn end_paragraph(&mut self) -> Result<()> {
        active!(self, text => text.end_paragraph())
    }

    /// Apply a command to the active assembler.
    ///
    /// Only `\endnote` can yield diagnostics, from the markup in its text.
    pub fn apply(&mut self, command: Command<'_>) -> Result<Diagnostics> {
        match command {
            Command::Indent(n) => active!(self, text => text.set_indentation(n.into()))?,
            Command::ParIndent(n) => active!(self, text => text.set_par_indentation(n.into()))?,
            Command::TextWidth(n) => active!(self, text => text.set_text_width(n.into()))?,
            Command::TextHeight(n) => active!(self, text => text.set_text_height(n.into()))?,
            Command::ParSkip(n) => active!(self, text => text.set_par_skip(n.into()))?,
            Command::Fill(on) => active!(self, text => text.set_fill(on))?,
            Command::Justify(on) => active!(self, text => text.set_justify(on)),
            Command::Endnote(note) => return self.format_endnote(note),
        }
        Ok(Diagnostics::default())
    }

    /// Register an endnote.
    ///
    /// The marker `[n]` joins the word being built in the main text, and
    /// `"[n] " + note` is formatted as one endnote paragraph.
    pub fn format_endnote(&mut self, note: &str) -> Result<Diagnostics> {
        if self.in_endnote {
            return Err(FormatError::NestedEndnote);
        }
        self.ref_num += 1;
        let marker = format!("[{}]", self.ref_num);
        debug!(number = self.ref_num, "endnote registered");
        self.main.add_text(&marker);

        let source = format!("{marker} {note}");
        self.in_endnote = true;
        let mut parser = InputParser::new(&source, self);
        let outcome = parser.run();
        let diagnostics = parser.into_diagnostics();
        self.in_endnote = false;
        outcome?;

        self.endnotes.end_paragraph()?;
        Ok(diagnostics)
    }

    /// Finish the document: flush main text, then print collected endnotes
    pub fn close(&mut self) -> Result<()> {
        self.main.end_paragraph()?;
        let notes = self.endnotes.sink_mut().take_lines();
        if !notes.is_empty() {
            let skip = self.endnotes.config().par_skip;
            let printer = self.main.sink_mut();
            printer.skip(skip)?;
            for line in &notes {
                printer.write(line)?;
            }
        }
        self.main.sink_mut().flush()
    }

    /// Number of endnotes registered so far
    pub fn endnote_count(&self) -> usize {
        self.ref_num
    }

    pub fn main_text(&self) -> &LineAssembler<PagePrinter<W>> {
        &self.main
    }

    pub fn endnote_text(&self) -> &LineAssembler<PageCollector> {
        &self.endnotes
    }

    pub fn into_output(self) -> W {
        self.main.into_sink().into_inner()
    }
}
