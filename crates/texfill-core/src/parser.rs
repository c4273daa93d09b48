// SPDX-License-Identifier: AGPL-3.0-or-later
//! Drives tokens from the lexer into a [`Controller`]
//!
//! Recoverable errors (unknown commands, bad arguments, illegal characters)
//! are reported and skipped. A malformed brace argument stops tokenizing;
//! output committed up to that point is still flushed on close. I/O errors
//! from the output stream abort the run.

use std::io::Write;

use tracing::{error, warn};

use crate::command::Command;
use crate::controller::Controller;
use crate::lexer::{Lexer, Token};
use crate::traits::{Diagnostic, Diagnostics, FormatError, Result};

/// Reads markup and sends the resulting events to a controller
pub struct InputParser<'a, W: Write> {
    lexer: Lexer<'a>,
    out: &'a mut Controller<W>,
    diagnostics: Diagnostics,
}

impl<'a, W: Write> InputParser<'a, W> {
    pub fn new(src: &'a str, out: &'a mut Controller<W>) -> Self {
        Self {
            lexer: Lexer::new(src),
            out,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Process all input, then close the controller
    pub fn process(mut self) -> Result<Diagnostics> {
        self.run()?;
        self.out.close()?;
        Ok(self.diagnostics)
    }

    /// Process all input without closing the controller.
    ///
    /// Returns `Err` only for output failures; everything else is recorded
    /// in the diagnostics.
    pub fn run(&mut self) -> Result<()> {
        while self.diagnostics.fatal.is_none() {
            let line = self.lexer.line();
            let outcome = match self.lexer.next() {
                None => break,
                Some(Ok(token)) => self.dispatch(token, line),
                Some(Err(e)) => Err(e),
            };
            match outcome {
                Ok(()) => {}
                Err(e @ FormatError::Io(_)) => return Err(e),
                Err(e) if e.is_fatal() => {
                    error!(line, error = %e, "input processing halted");
                    self.diagnostics.fatal = Some(Diagnostic { line, error: e });
                }
                Err(e) => self.report(line, e),
            }
        }
        Ok(())
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn report(&mut self, line: usize, error: FormatError) {
        warn!(line, error = %error, "format error");
        self.diagnostics.reported.push(Diagnostic { line, error });
    }

    fn dispatch(&mut self, token: Token<'_>, line: usize) -> Result<()> {
        match token {
            Token::Blank => self.out.end_word(),
            Token::Newline => self.out.add_newline(),
            Token::ParagraphBreak => self.out.end_paragraph(),
            Token::Escaped(c) => {
                self.out.add_text(c.encode_utf8(&mut [0; 4]));
                Ok(())
            }
            Token::Text(text) => {
                self.out.add_text(text);
                Ok(())
            }
            Token::Command { name, arg } => {
                let command = Command::parse(name, arg)?;
                let nested = self.out.apply(command)?;
                self.absorb(nested, line);
                Ok(())
            }
            Token::Illegal(ch) => Err(FormatError::IllegalCharacter { ch }),
        }
    }

    /// Merge diagnostics from endnote text starting on input line `line`
    fn absorb(&mut self, nested: Diagnostics, line: usize) {
        let shift = |d: Diagnostic| Diagnostic {
            line: line + d.line - 1,
            error: d.error,
        };
        self.diagnostics
            .reported
            .extend(nested.reported.into_iter().map(shift));
        if let Some(fatal) = nested.fatal {
            self.diagnostics.fatal = Some(shift(fatal));
        }
    }
}
