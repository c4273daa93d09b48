// SPDX-License-Identifier: AGPL-3.0-or-later
//! Command vocabulary and argument validation

use crate::traits::{FormatError, Result};

/// A validated formatting command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Indent(i32),
    ParIndent(i32),
    TextWidth(i32),
    TextHeight(i32),
    ParSkip(i32),
    Fill(bool),
    Justify(bool),
    Endnote(&'a str),
}

impl<'a> Command<'a> {
    /// Check the shape of `\name{arg}` and build the command it names
    pub fn parse(name: &str, arg: Option<&'a str>) -> Result<Self> {
        match name {
            "indent" => Ok(Self::Indent(integer(name, arg)?)),
            "parindent" => Ok(Self::ParIndent(integer(name, arg)?)),
            "textwidth" => Ok(Self::TextWidth(integer(name, arg)?)),
            "textheight" => Ok(Self::TextHeight(integer(name, arg)?)),
            "parskip" => Ok(Self::ParSkip(integer(name, arg)?)),
            "nofill" => no_argument(name, arg).map(|()| Self::Fill(false)),
            "fill" => no_argument(name, arg).map(|()| Self::Fill(true)),
            "nojustify" => no_argument(name, arg).map(|()| Self::Justify(false)),
            "justify" => no_argument(name, arg).map(|()| Self::Justify(true)),
            "endnote" => required(name, arg).map(Self::Endnote),
            _ => Err(FormatError::UnknownCommand {
                command: name.to_string(),
            }),
        }
    }
}

fn required<'a>(name: &str, arg: Option<&'a str>) -> Result<&'a str> {
    arg.ok_or_else(|| FormatError::MissingArgument {
        command: name.to_string(),
    })
}

fn no_argument(name: &str, arg: Option<&str>) -> Result<()> {
    match arg {
        None => Ok(()),
        Some(_) => Err(FormatError::UnexpectedArgument {
            command: name.to_string(),
        }),
    }
}

fn integer(name: &str, arg: Option<&str>) -> Result<i32> {
    let arg = required(name, arg)?;
    arg.trim().parse().map_err(|_| FormatError::NotAnInteger {
        command: name.to_string(),
        arg: arg.to_string(),
    })
}
