// SPDX-License-Identifier: AGPL-3.0-or-later
//! texfill - format a markup document into filled, paginated plain text

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use texfill_core::{format_reader, Settings};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "texfill", version, about)]
struct Cli {
    /// Input document, or `-` for standard input
    input: PathBuf,

    /// Output file; standard output when omitted
    output: Option<PathBuf>,

    /// TOML settings with optional [text] and [endnote] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting text width for the main text
    #[arg(short = 'w', long)]
    text_width: Option<usize>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(width) = self.text_width {
            settings.text.text_width = width;
            settings.validate().context("invalid --text-width")?;
        }
        Ok(settings)
    }

    fn reader(&self) -> Result<Box<dyn Read>> {
        if self.input.as_os_str() == "-" {
            return Ok(Box::new(io::stdin().lock()));
        }
        let file = File::open(&self.input)
            .with_context(|| format!("failed to open {}", self.input.display()))?;
        Ok(Box::new(file))
    }

    fn writer(&self) -> Result<Box<dyn Write>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let settings = cli.settings()?;
    debug!(?settings, "settings resolved");

    let diagnostics = format_reader(cli.reader()?, cli.writer()?, &settings)
        .with_context(|| format!("failed to format {}", cli.input.display()))?;

    for diagnostic in diagnostics.iter() {
        eprintln!("{diagnostic}");
    }
    info!(
        reported = diagnostics.reported.len(),
        halted = diagnostics.fatal.is_some(),
        "done"
    );
    Ok(diagnostics.is_clean())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("texfill: {e:#}");
            ExitCode::FAILURE
        }
    }
}
