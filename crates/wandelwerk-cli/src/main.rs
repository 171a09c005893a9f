// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wandelwerk — batch document converter.
//
// Entry point. Parses the command line, loads configuration, installs the
// log file subscriber, and hands the inputs to the batch driver.

mod logging;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use wandelwerk_core::{AppConfig, TargetFormat};
use wandelwerk_document::{BatchDriver, BatchOptions, ConversionSettings};

use reporter::ConsoleReporter;

/// Convert documents between PDF, DOCX, plain text, Markdown, and images.
#[derive(Parser, Debug)]
#[command(name = "wandelwerk", version, about, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one or more files, or print their metadata.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input file(s) to convert. Repeat the flag for several files.
    #[arg(short, long = "input", required = true)]
    input: Vec<PathBuf>,

    /// Output file or directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target format.
    #[arg(short, long, value_enum)]
    to: TargetArg,

    /// Extract metadata only.
    #[arg(long)]
    metadata: bool,

    /// JSON settings file.
    #[arg(long, env = "WANDELWERK_CONFIG")]
    config: Option<PathBuf>,

    /// Append log lines to this file instead of the configured one.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Mirror log lines to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TargetArg {
    Pdf,
    Docx,
    Txt,
    Md,
    Jpg,
    Png,
}

impl From<TargetArg> for TargetFormat {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Pdf => TargetFormat::Pdf,
            TargetArg::Docx => TargetFormat::Docx,
            TargetArg::Txt => TargetFormat::Txt,
            TargetArg::Md => TargetFormat::Md,
            TargetArg::Jpg => TargetFormat::Jpg,
            TargetArg::Png => TargetFormat::Png,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Convert(args) => convert(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }

    let _guard = logging::init(&config.log_file, args.verbose)?;
    info!(
        inputs = args.input.len(),
        to = ?args.to,
        metadata = args.metadata,
        "Wandelwerk starting"
    );

    let options = BatchOptions {
        target: args.to.into(),
        output: args.output,
        metadata_only: args.metadata,
        missing_input: config.missing_input,
    };
    let driver = BatchDriver::new(ConversionSettings::from_config(&config));
    let summary = driver.run(&args.input, &options, &ConsoleReporter::stdout())?;

    debug!(?summary, "Batch summary");
    Ok(())
}
