// SPDX-License-Identifier: AGPL-3.0-or-later
//! Line assembly: characters into words, words into lines
//!
//! A [`LineAssembler`] builds the current word from text runs, appends
//! finished words to a pending line, and hands complete lines to its
//! [`PageSink`]. Under fill mode a line is emitted as soon as the next word
//! would push its content past the text width; without fill, lines break only
//! where the caller asks.
//!
//! Raw lines ([`LineAssembler::add_line`]) and filled words do not mix: a raw
//! line is rejected while a word or pending line is still unflushed.

use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::FormatConfig;
use crate::traits::{FormatError, PageSink, Result};

/// Display width of a word, in grapheme clusters
pub fn text_width(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Join `words` so the result is exactly `width` columns wide.
///
/// Padding is spread evenly over the gaps between words, with any remainder
/// going to the leftmost gaps. A single word, or words that already reach
/// `width`, are joined with single spaces.
pub fn justify_words(words: &[String], width: usize) -> String {
    let gaps = words.len().saturating_sub(1);
    let content: usize = words.iter().map(|w| text_width(w)).sum();
    if gaps == 0 || content + gaps >= width {
        return words.join(" ");
    }

    let padding = width - content;
    let base = padding / gaps;
    let wider = padding % gaps;

    let mut line = String::with_capacity(width + words.iter().map(String::len).sum::<usize>());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let gap = if i <= wider { base + 1 } else { base };
            line.extend(std::iter::repeat(' ').take(gap));
        }
        line.push_str(word);
    }
    line
}

/// Accumulates words into lines and emits them to a page sink
#[derive(Debug)]
pub struct LineAssembler<S: PageSink> {
    sink: S,
    config: FormatConfig,
    /// Word under construction
    word: String,
    /// Finished words of the pending line
    words: Vec<String>,
    /// Width of the pending line with single spaces between words
    chars: usize,
    /// Next emitted line opens a paragraph
    first_line: bool,
    /// A paragraph with output has ended; skip before the next one
    skip_pending: bool,
}

impl<S: PageSink> LineAssembler<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, FormatConfig::default())
    }

    pub fn with_config(mut sink: S, config: FormatConfig) -> Self {
        sink.set_text_height(config.text_height);
        Self {
            sink,
            config,
            word: String::new(),
            words: Vec::new(),
            chars: 0,
            first_line: true,
            skip_pending: false,
        }
    }

    /// Append `text` to the word being built
    pub fn add_text(&mut self, text: &str) {
        self.word.push_str(text);
    }

    /// Finish the current word at a whitespace boundary.
    ///
    /// Does nothing when no word is being built, so runs of whitespace
    /// collapse.
    pub fn end_word(&mut self) -> Result<()> {
        if self.word.is_empty() {
            return Ok(());
        }
        let word = std::mem::take(&mut self.word);
        self.push_word(word)
    }

    /// Finish the current word outside a whitespace boundary, such as before
    /// a forced break or at end of input
    pub fn finish_word(&mut self) -> Result<()> {
        self.end_word()
    }

    /// Add a finished word to the pending line, applying fill policy
    pub fn add_word(&mut self, word: &str) -> Result<()> {
        if word.is_empty() {
            return Ok(());
        }
        self.push_word(word.to_string())
    }

    fn push_word(&mut self, word: String) -> Result<()> {
        let width = text_width(&word);
        if self.config.fill
            && !self.words.is_empty()
            && self.chars + 1 + width > self.config.text_width
        {
            self.emit_pending(true)?;
        }
        if !self.words.is_empty() {
            self.chars += 1;
        }
        self.chars += width;
        self.words.push(word);
        Ok(())
    }

    /// Emit `text` as one complete line, bypassing fill.
    ///
    /// Fails with [`FormatError::MixedLineInput`] while a word or pending
    /// line is unflushed.
    pub fn add_line(&mut self, text: &str) -> Result<()> {
        if !self.word.is_empty() || !self.words.is_empty() {
            return Err(FormatError::MixedLineInput);
        }
        self.write_line(text)
    }

    /// Emit the pending line as-is, without justification
    pub fn new_line(&mut self) -> Result<()> {
        self.finish_word()?;
        self.emit_pending(false)
    }

    /// End the current paragraph.
    ///
    /// Flushes the partially filled line (its last line is never justified)
    /// and arms the paragraph skip. An empty paragraph emits nothing.
    pub fn end_paragraph(&mut self) -> Result<()> {
        self.finish_word()?;
        self.emit_pending(false)?;
        if !self.first_line {
            debug!("paragraph ended");
            self.skip_pending = true;
        }
        self.first_line = true;
        Ok(())
    }

    pub fn set_indentation(&mut self, value: i64) -> Result<()> {
        self.config.set_indent(value)
    }

    pub fn set_par_indentation(&mut self, value: i64) -> Result<()> {
        self.config.set_par_indent(value)
    }

    pub fn set_text_width(&mut self, value: i64) -> Result<()> {
        self.config.set_text_width(value)
    }

    pub fn set_text_height(&mut self, value: i64) -> Result<()> {
        self.config.set_text_height(value)?;
        self.sink.set_text_height(self.config.text_height);
        Ok(())
    }

    pub fn set_par_skip(&mut self, value: i64) -> Result<()> {
        self.config.set_par_skip(value)
    }

    /// Turn fill mode on or off.
    ///
    /// A real change flushes the pending line first, so words gathered under
    /// one mode are never laid out under the other.
    pub fn set_fill(&mut self, fill: bool) -> Result<()> {
        if fill != self.config.fill {
            debug!(fill, "fill mode changed");
            self.new_line()?;
        }
        self.config.fill = fill;
        Ok(())
    }

    pub fn set_justify(&mut self, justify: bool) {
        self.config.justify = justify;
    }

    /// The word being built, if any
    pub fn word(&self) -> Option<&str> {
        if self.word.is_empty() {
            None
        } else {
            Some(&self.word)
        }
    }

    /// Finished words not yet emitted
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Width of the pending line, counting one space between words
    pub fn chars(&self) -> usize {
        self.chars
    }

    pub fn fill(&self) -> bool {
        self.config.fill
    }

    pub fn justify(&self) -> bool {
        self.config.justify
    }

    pub fn first_line(&self) -> bool {
        self.first_line
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit the pending words, justified when `full` and the mode allows
    fn emit_pending(&mut self, full: bool) -> Result<()> {
        if self.words.is_empty() {
            return Ok(());
        }
        let body = if full && self.config.fill && self.config.justify {
            justify_words(&self.words, self.config.text_width)
        } else {
            self.words.join(" ")
        };
        self.words.clear();
        self.chars = 0;
        self.write_line(&body)
    }

    fn write_line(&mut self, body: &str) -> Result<()> {
        let indent = if self.first_line {
            if self.skip_pending {
                self.sink.skip(self.config.par_skip)?;
            }
            self.config.par_indent
        } else {
            self.config.indent
        };
        self.skip_pending = false;
        self.first_line = false;

        let mut line = " ".repeat(indent);
        line.push_str(body);
        trace!(line = %line, "emit");
        self.sink.write(&line)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::page::PageCollector;
    use proptest::prelude::*;

    fn word_strategy() -> impl Strategy<Value = String> {
        "[a-z]{1,8}"
    }

    fn config_strategy() -> impl Strategy<Value = FormatConfig> {
        (8usize..40, 0usize..6, 0usize..6, proptest::bool::ANY).prop_map(
            |(text_width, indent, par_indent, justify)| FormatConfig {
                text_width,
                indent,
                par_indent,
                justify,
                ..FormatConfig::default()
            },
        )
    }

    fn indent_of(line: &str) -> usize {
        line.len() - line.trim_start().len()
    }

    proptest! {
        // Property: filled lines never exceed the text width
        #[test]
        fn prop_fill_respects_width(
            config in config_strategy(),
            input in prop::collection::vec(word_strategy(), 0..60),
        ) {
            let width = config.text_width;
            let mut text = LineAssembler::with_config(PageCollector::new(), config);
            for word in &input {
                text.add_text(word);
                text.end_word().unwrap();
            }
            text.end_paragraph().unwrap();

            for line in text.sink().lines() {
                prop_assert!(text_width(line.trim_start()) <= width, "{:?}", line);
            }
        }

        // Property: filling keeps every word, in order, unsplit
        #[test]
        fn prop_fill_preserves_words(
            config in config_strategy(),
            input in prop::collection::vec(word_strategy(), 0..60),
        ) {
            let mut text = LineAssembler::with_config(PageCollector::new(), config);
            for word in &input {
                text.add_word(word).unwrap();
            }
            text.end_paragraph().unwrap();

            let output: Vec<String> = text
                .sink()
                .lines()
                .iter()
                .flat_map(|l| l.split_whitespace().map(str::to_string).collect::<Vec<_>>())
                .collect();
            prop_assert_eq!(output, input);
        }

        // Property: without fill, one emitted line per submitted line
        #[test]
        fn prop_nofill_line_count(
            lines in prop::collection::vec(prop::collection::vec(word_strategy(), 1..12), 0..20),
        ) {
            let mut text = LineAssembler::new(PageCollector::new());
            text.set_fill(false).unwrap();
            text.set_text_width(5).unwrap();
            for line in &lines {
                for word in line {
                    text.add_word(word).unwrap();
                }
                text.new_line().unwrap();
            }
            text.end_paragraph().unwrap();

            prop_assert_eq!(text.sink().lines().len(), lines.len());
            for (emitted, submitted) in text.sink().lines().iter().zip(&lines) {
                prop_assert_eq!(emitted.trim_start(), submitted.join(" "));
            }
        }

        // Property: justified gaps sum to the slack and differ by at most one
        #[test]
        fn prop_justify_gaps(
            input in prop::collection::vec(word_strategy(), 2..8),
            extra in 0usize..20,
        ) {
            let content: usize = input.iter().map(|w| w.len()).sum();
            let width = content + input.len() - 1 + extra;
            let line = justify_words(&input, width);

            prop_assert_eq!(line.len(), width);
            let gaps: Vec<usize> = line
                .split(|c: char| c != ' ')
                .filter(|g| !g.is_empty())
                .map(str::len)
                .collect();
            prop_assert_eq!(gaps.len(), input.len() - 1);
            prop_assert_eq!(gaps.iter().sum::<usize>(), width - content);
            let (min, max) = (gaps.iter().min().unwrap(), gaps.iter().max().unwrap());
            prop_assert!(max - min <= 1);
            prop_assert_eq!(line.split_whitespace().collect::<Vec<_>>(), input.iter().map(String::as_str).collect::<Vec<_>>());
        }

        // Property: pending chars equals word widths plus single spaces
        #[test]
        fn prop_pending_char_count(input in prop::collection::vec(word_strategy(), 0..30)) {
            let mut text = LineAssembler::new(PageCollector::new());
            text.set_fill(false).unwrap();
            for word in &input {
                text.add_word(word).unwrap();
            }
            let expected = input.iter().map(|w| w.len()).sum::<usize>() + input.len().saturating_sub(1);
            prop_assert_eq!(text.chars(), expected);
        }

        // Property: first lines take the paragraph indent, others the body indent
        #[test]
        fn prop_indentation(
            config in config_strategy(),
            paragraphs in prop::collection::vec(prop::collection::vec(word_strategy(), 1..20), 1..4),
        ) {
            let (indent, par_indent) = (config.indent, config.par_indent);
            let mut text = LineAssembler::with_config(PageCollector::new(), config);
            let mut expected = Vec::new();
            for paragraph in &paragraphs {
                let before = text.sink().lines().len();
                for word in paragraph {
                    text.add_word(word).unwrap();
                }
                text.end_paragraph().unwrap();
                let emitted = text.sink().lines().len() - before;
                expected.push(par_indent);
                expected.extend(std::iter::repeat(indent).take(emitted - 1));
            }
            let actual: Vec<usize> = text.sink().lines().iter().map(|l| indent_of(l)).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
