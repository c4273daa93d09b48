// SPDX-License-Identifier: AGPL-3.0-or-later
//! Page assemblers: the two destinations for finished lines
//!
//! [`PagePrinter`] writes lines to an output stream and paginates them.
//! [`PageCollector`] keeps lines in order for later emission, which is how
//! endnotes are held until the main text is done.

use std::io::Write;

use crate::config::DEFAULT_TEXT_HEIGHT;
use crate::traits::{PageSink, Result};

/// Separates pages in printed output
pub const PAGE_BREAK: char = '\x0c';

/// Writes lines to a stream, starting a new page every `text_height` lines
#[derive(Debug)]
pub struct PagePrinter<W: Write> {
    out: W,
    text_height: usize,
    lines_on_page: usize,
    pages: usize,
}

impl<W: Write> PagePrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            text_height: DEFAULT_TEXT_HEIGHT,
            lines_on_page: 0,
            pages: 1,
        }
    }

    /// Number of pages started so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn lines_on_page(&self) -> usize {
        self.lines_on_page
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PageSink for PagePrinter<W> {
    fn write(&mut self, line: &str) -> Result<()> {
        if self.lines_on_page >= self.text_height {
            write!(self.out, "{PAGE_BREAK}")?;
            self.lines_on_page = 0;
            self.pages += 1;
        }
        writeln!(self.out, "{line}")?;
        self.lines_on_page += 1;
        Ok(())
    }

    fn skip(&mut self, lines: usize) -> Result<()> {
        // Never at the top of a page, never onto the next one
        if self.lines_on_page == 0 {
            return Ok(());
        }
        let room = self.text_height.saturating_sub(self.lines_on_page);
        for _ in 0..lines.min(room) {
            writeln!(self.out)?;
            self.lines_on_page += 1;
        }
        Ok(())
    }

    fn set_text_height(&mut self, height: usize) {
        self.text_height = height.max(1);
    }
}

/// Collects lines verbatim, in order, without pagination
#[derive(Debug, Default)]
pub struct PageCollector {
    lines: Vec<String>,
}

impl PageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue appending to lines collected elsewhere
    pub fn with_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Remove and return everything collected so far
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl PageSink for PageCollector {
    fn write(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
