// SPDX-License-Identifier: AGPL-3.0-or-later
//! Layout configuration for main text and endnotes
//!
//! Values arrive from commands as signed integers and are validated before
//! any field is touched, so a rejected setter never leaves a partial update.

use serde::Deserialize;
use std::path::Path;

use crate::traits::{FormatError, Result};

pub const DEFAULT_TEXT_WIDTH: usize = 72;
pub const DEFAULT_INDENT: usize = 0;
pub const DEFAULT_PAR_INDENT: usize = 4;
pub const DEFAULT_TEXT_HEIGHT: usize = i32::MAX as usize;
pub const DEFAULT_PAR_SKIP: usize = 0;

/// Largest accepted width, indentation or paragraph skip
pub const MAX_LAYOUT: usize = 10_000;

pub const ENDNOTE_TEXT_WIDTH: usize = 72;
pub const ENDNOTE_INDENT: usize = 4;
pub const ENDNOTE_PAR_INDENT: usize = 0;
pub const ENDNOTE_PAR_SKIP: usize = 1;

/// Formatting parameters owned by one line assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Indentation of every line after the first in a paragraph
    pub indent: usize,
    /// Indentation of the first line of a paragraph
    pub par_indent: usize,
    /// Maximum width of a line's word content, not counting indentation
    pub text_width: usize,
    /// Lines per page
    pub text_height: usize,
    /// Blank lines between paragraphs
    pub par_skip: usize,
    pub fill: bool,
    pub justify: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            par_indent: DEFAULT_PAR_INDENT,
            text_width: DEFAULT_TEXT_WIDTH,
            text_height: DEFAULT_TEXT_HEIGHT,
            par_skip: DEFAULT_PAR_SKIP,
            fill: true,
            justify: true,
        }
    }
}

impl FormatConfig {
    /// Configuration used for endnote text
    pub fn endnote() -> Self {
        Self {
            indent: ENDNOTE_INDENT,
            par_indent: ENDNOTE_PAR_INDENT,
            text_width: ENDNOTE_TEXT_WIDTH,
            par_skip: ENDNOTE_PAR_SKIP,
            ..Self::default()
        }
    }

    pub fn set_indent(&mut self, value: i64) -> Result<()> {
        self.indent = layout("indent", value, 0)?;
        Ok(())
    }

    pub fn set_par_indent(&mut self, value: i64) -> Result<()> {
        self.par_indent = layout("parindent", value, 0)?;
        Ok(())
    }

    pub fn set_text_width(&mut self, value: i64) -> Result<()> {
        self.text_width = layout("textwidth", value, 1)?;
        Ok(())
    }

    pub fn set_text_height(&mut self, value: i64) -> Result<()> {
        self.text_height = match usize::try_from(value) {
            Ok(v) if (1..=DEFAULT_TEXT_HEIGHT).contains(&v) => v,
            _ => {
                return Err(FormatError::Configuration {
                    option: "textheight",
                    value,
                    requirement: "between 1 and 2147483647",
                })
            }
        };
        Ok(())
    }

    pub fn set_par_skip(&mut self, value: i64) -> Result<()> {
        self.par_skip = layout("parskip", value, 0)?;
        Ok(())
    }

    /// Check the same ranges the setters enforce
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("indent", self.indent, 0, MAX_LAYOUT),
            ("par_indent", self.par_indent, 0, MAX_LAYOUT),
            ("text_width", self.text_width, 1, MAX_LAYOUT),
            ("text_height", self.text_height, 1, DEFAULT_TEXT_HEIGHT),
            ("par_skip", self.par_skip, 0, MAX_LAYOUT),
        ];
        for (name, value, min, max) in ranges {
            if !(min..=max).contains(&value) {
                return Err(FormatError::InvalidSettings(format!(
                    "{name} must be between {min} and {max}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Validate a width, indentation or skip of at least `min` columns
fn layout(option: &'static str, value: i64, min: usize) -> Result<usize> {
    match usize::try_from(value) {
        Ok(v) if (min..=MAX_LAYOUT).contains(&v) => Ok(v),
        _ => Err(FormatError::Configuration {
            option,
            value,
            requirement: if min == 0 {
                "between 0 and 10000"
            } else {
                "between 1 and 10000"
            },
        }),
    }
}

/// Starting configuration for a document run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSettings")]
pub struct Settings {
    pub text: FormatConfig,
    pub endnote: FormatConfig,
}

/// Keys present in one settings table; absent keys keep the base value
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    indent: Option<usize>,
    par_indent: Option<usize>,
    text_width: Option<usize>,
    text_height: Option<usize>,
    par_skip: Option<usize>,
    fill: Option<bool>,
    justify: Option<bool>,
}

impl ConfigOverrides {
    fn apply(self, base: FormatConfig) -> FormatConfig {
        FormatConfig {
            indent: self.indent.unwrap_or(base.indent),
            par_indent: self.par_indent.unwrap_or(base.par_indent),
            text_width: self.text_width.unwrap_or(base.text_width),
            text_height: self.text_height.unwrap_or(base.text_height),
            par_skip: self.par_skip.unwrap_or(base.par_skip),
            fill: self.fill.unwrap_or(base.fill),
            justify: self.justify.unwrap_or(base.justify),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSettings {
    text: ConfigOverrides,
    endnote: ConfigOverrides,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        Self {
            text: raw.text.apply(FormatConfig::default()),
            endnote: raw.endnote.apply(FormatConfig::endnote()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text: FormatConfig::default(),
            endnote: FormatConfig::endnote(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML with optional `[text]` and `[endnote]` tables
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| FormatError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    pub fn validate(&self) -> Result<()> {
        self.text.validate()?;
        self.endnote.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FormatConfig::default();
        assert_eq!(config.text_width, 72);
        assert_eq!(config.par_indent, 4);
        assert!(config.fill);
        assert!(config.justify);

        let endnote = FormatConfig::endnote();
        assert_eq!(endnote.indent, 4);
        assert_eq!(endnote.par_indent, 0);
        assert_eq!(endnote.par_skip, 1);
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut config = FormatConfig::default();
        config.set_indent(6).unwrap();

        assert!(matches!(
            config.set_indent(-1),
            Err(FormatError::Configuration { option: "indent", value: -1, .. })
        ));
        assert!(config.set_par_indent(-100).is_err());
        assert!(config.set_text_width(-3).is_err());
        assert!(config.set_text_height(-50).is_err());
        assert!(config.set_par_skip(-2).is_err());

        assert_eq!(config.indent, 6);
        assert_eq!(config.par_indent, DEFAULT_PAR_INDENT);
        assert_eq!(config.text_width, DEFAULT_TEXT_WIDTH);
        assert_eq!(config.text_height, DEFAULT_TEXT_HEIGHT);
        assert_eq!(config.par_skip, DEFAULT_PAR_SKIP);
    }

    #[test]
    fn test_zero_width_rejected() {
        let mut config = FormatConfig::default();
        assert!(config.set_text_width(0).is_err());
        assert!(config.set_text_height(0).is_err());
        assert!(config.set_par_skip(0).is_ok());
        assert!(config.set_indent(0).is_ok());
    }

    #[test]
    fn test_settings_partial_toml() {
        let settings = Settings::from_toml_str(
            "[text]\ntext_width = 40\njustify = false\n\n[endnote]\npar_skip = 2\n",
        )
        .unwrap();

        assert_eq!(settings.text.text_width, 40);
        assert!(!settings.text.justify);
        assert_eq!(settings.text.par_indent, DEFAULT_PAR_INDENT);
        assert_eq!(settings.endnote.par_skip, 2);
        assert_eq!(settings.endnote.indent, ENDNOTE_INDENT);
    }

    #[test]
    fn test_settings_rejects_bad_values() {
        assert!(matches!(
            Settings::from_toml_str("[text]\ntext_width = 0\n"),
            Err(FormatError::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_toml_str("[text]\nindent = -4\n"),
            Err(FormatError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_layout_values_bounded() {
        let mut config = FormatConfig::default();
        assert!(config.set_indent(MAX_LAYOUT as i64).is_ok());
        assert!(matches!(
            config.set_indent(i64::MAX),
            Err(FormatError::Configuration { option: "indent", .. })
        ));
        assert!(config.set_par_indent(MAX_LAYOUT as i64 + 1).is_err());
        assert!(config.set_text_width(i32::MAX.into()).is_err());
        assert!(config.set_par_skip(i32::MAX.into()).is_err());
        assert!(config.set_text_height(i32::MAX.into()).is_ok());
        assert!(config.set_text_height(i64::from(i32::MAX) + 1).is_err());

        assert_eq!(config.indent, MAX_LAYOUT);
        assert_eq!(config.par_indent, DEFAULT_PAR_INDENT);
        assert_eq!(config.text_width, DEFAULT_TEXT_WIDTH);
        assert_eq!(config.par_skip, DEFAULT_PAR_SKIP);

        let err = Settings::from_toml_str("[endnote]\nindent = 20000\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid settings: indent must be between 0 and 10000, got 20000"
        );
    }

    #[test]
    fn test_settings_unknown_key() {
        assert!(Settings::from_toml_str("[text]\nwidth = 10\n").is_err());
    }

    #[test]
    fn test_settings_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[text]\nindent = 2\npar_indent = 6").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.text.indent, 2);
        assert_eq!(settings.text.par_indent, 6);
        assert_eq!(settings.endnote, FormatConfig::endnote());
    }

    #[test]
    fn test_settings_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(Settings::load(&missing), Err(FormatError::Io(_))));
    }
}
