// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type and the page sink capability shared by the formatter

use std::fmt;

/// Error type for tokenizing, dispatching and laying out a document
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid value {value} for {option}: must be {requirement}")]
    Configuration {
        option: &'static str,
        value: i64,
        requirement: &'static str,
    },

    #[error("argument `{arg}` to \\{command} is not an integer")]
    NotAnInteger { command: String, arg: String },

    #[error("\\{command} takes no argument")]
    UnexpectedArgument { command: String },

    #[error("\\{command} needs an argument in {{}}")]
    MissingArgument { command: String },

    #[error("unknown command: \\{command}")]
    UnknownCommand { command: String },

    #[error("malformed argument to \\{command}: missing `}}` or braces nested too deeply")]
    MalformedArgument { command: String },

    #[error("erroneous input: {ch:?}")]
    IllegalCharacter { ch: char },

    #[error("cannot add a raw line while a filled word is pending")]
    MixedLineInput,

    #[error("\\endnote cannot appear inside an endnote")]
    NestedEndnote,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Errors after which input processing cannot safely continue
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedArgument { .. } | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// A reported error together with the input line it came from
#[derive(Debug)]
pub struct Diagnostic {
    pub line: usize,
    pub error: FormatError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Outcome of processing one document
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Recoverable errors, in input order
    pub reported: Vec<Diagnostic>,
    /// The error that stopped tokenizing early, if any
    pub fatal: Option<Diagnostic>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.reported.is_empty() && self.fatal.is_none()
    }

    /// All diagnostics, fatal last
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter().chain(self.fatal.iter())
    }
}

/// Destination for finished lines.
///
/// Lines handed to a sink are final: indented, justified and width-bounded.
/// A sink only deposits them somewhere.
pub trait PageSink {
    /// Deposit one finished line
    fn write(&mut self, line: &str) -> Result<()>;

    /// Deposit `lines` blank lines of inter-paragraph skip
    fn skip(&mut self, lines: usize) -> Result<()> {
        for _ in 0..lines {
            self.write("")?;
        }
        Ok(())
    }

    /// Lines per page; sinks without pagination ignore it
    fn set_text_height(&mut self, _height: usize) {}
}
