use clap::Parser;
use miette::Result;
use std::path::PathBuf;

use flow_comment_scrub::cli::scrub::{self, OutputMode, ReportFormat, ScrubArgs};

#[derive(Parser)]
#[command(name = "flow-comment-scrub")]
#[command(about = "Remove Flow annotation comments and translate @noflow to @ts-nocheck")]
#[command(version)]
struct Cli {
    /// Input source files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Rewrite changed files in place
    #[arg(short, long, conflicts_with = "check")]
    write: bool,

    /// Write nothing; exit with an error if any file contains Flow comments
    #[arg(long)]
    check: bool,

    /// Parse every input as TypeScript (TSX), regardless of extension
    #[arg(long)]
    typescript: bool,

    /// Report format (text, json)
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let mode = if cli.write {
        OutputMode::Write
    } else if cli.check {
        OutputMode::Check
    } else {
        OutputMode::Print
    };

    let args = ScrubArgs {
        inputs: cli.inputs,
        mode,
        typescript: cli.typescript,
        format: cli.format,
    };
    scrub::scrub(&args)?;
    Ok(())
}
