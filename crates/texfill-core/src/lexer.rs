// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tokenizer for texfill markup
//!
//! Input is plain text with backslash commands. At each position the lexer
//! tries, in order: a run of blanks, a newline run (two or more newlines end
//! a paragraph), an escaped `\ `, `\{`, `\}` or `\\`, a command `\name`
//! with an optional `{argument}`, a run of ordinary text, and finally a
//! single illegal character.
//!
//! Command arguments may contain escapes and one level of nested braces.
//! They are returned raw; the only consumer that re-reads an argument as
//! markup (endnotes) tokenizes it again, which resolves escapes once.

use crate::traits::{FormatError, Result};

/// One lexical unit of markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Spaces or tabs between words
    Blank,
    /// A single line break
    Newline,
    /// Two or more consecutive line breaks
    ParagraphBreak,
    /// Character following a backslash: blank, brace or backslash
    Escaped(char),
    /// `\name` or `\name{arg}`
    Command { name: &'a str, arg: Option<&'a str> },
    /// Run of ordinary characters
    Text(&'a str),
    /// A character that cannot appear here
    Illegal(char),
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_text(c: char) -> bool {
    !matches!(c, ' ' | '\t' | '\r' | '\n' | '\\' | '{' | '}')
}

/// Iterator over the tokens of a markup string
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    /// Set after a malformed argument; nothing more is produced
    halted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            halted: false,
        }
    }

    /// 1-based line of the next unread character
    pub fn line(&self) -> usize {
        self.line
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Length in bytes of a newline at the start of `s`, if any
    fn newline_len(s: &str) -> Option<usize> {
        if s.starts_with('\n') {
            Some(1)
        } else if s.starts_with("\r\n") {
            Some(2)
        } else {
            None
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }

    fn newlines(&mut self) -> Token<'a> {
        let mut count = 0;
        while let Some(len) = Self::newline_len(self.rest()) {
            self.pos += len;
            self.line += 1;
            count += 1;
        }
        if count > 1 {
            Token::ParagraphBreak
        } else {
            Token::Newline
        }
    }

    /// Scan a brace argument; `self.pos` is just past the opening `{`.
    /// Returns the content without the closing `}`.
    fn balanced_argument(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        let mut depth = 0;
        let mut lines = 0;
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    let (_, escaped) = chars.next()?;
                    if escaped == '\n' {
                        lines += 1;
                    }
                }
                '{' if depth == 0 => depth = 1,
                '{' => return None,
                '}' if depth == 1 => depth = 0,
                '}' => {
                    self.pos += i + 1;
                    self.line += lines;
                    return Some(&rest[..i]);
                }
                '\n' => lines += 1,
                _ => {}
            }
        }
        None
    }

    fn command(&mut self) -> Result<Token<'a>> {
        let name = self.take_while(|c| c.is_ascii_alphabetic());
        if self.peek() != Some('{') {
            return Ok(Token::Command { name, arg: None });
        }
        self.pos += 1;
        match self.balanced_argument() {
            Some(arg) => Ok(Token::Command {
                name,
                arg: Some(arg),
            }),
            None => {
                self.halted = true;
                Err(FormatError::MalformedArgument {
                    command: name.to_string(),
                })
            }
        }
    }

    fn next_token(&mut self) -> Option<Result<Token<'a>>> {
        if self.halted {
            return None;
        }
        let rest = self.rest();
        let c = rest.chars().next()?;

        if is_blank(c) {
            self.take_while(is_blank);
            return Some(Ok(Token::Blank));
        }
        if Self::newline_len(rest).is_some() {
            return Some(Ok(self.newlines()));
        }
        if c == '\\' {
            let mut after = rest[1..].chars();
            match after.next() {
                Some(e) if is_blank(e) || matches!(e, '{' | '}' | '\\') => {
                    self.pos += 1 + e.len_utf8();
                    return Some(Ok(Token::Escaped(e)));
                }
                Some(a) if a.is_ascii_alphabetic() => {
                    self.pos += 1;
                    return Some(self.command());
                }
                _ => {}
            }
        }
        if is_text(c) {
            return Some(Ok(Token::Text(self.take_while(is_text))));
        }
        self.pos += c.len_utf8();
        Some(Ok(Token::Illegal(c)))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
