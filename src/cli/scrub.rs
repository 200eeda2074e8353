use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::utils::{read_source, write_output};
use crate::comments::{scrub_source, ScrubStats};
use crate::error::{Error as ScrubError, Result as ScrubResult};
use crate::tree::builder::source_type_for;

/// Format of the per-file report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// What to do with the scrubbed sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Print scrubbed sources to stdout
    #[default]
    Print,
    /// Rewrite changed files in place
    Write,
    /// Write nothing, fail if any file would change
    Check,
}

/// Arguments for the scrub command
#[derive(Debug, Clone)]
pub struct ScrubArgs {
    pub inputs: Vec<PathBuf>,
    pub mode: OutputMode,
    pub typescript: bool,
    pub format: ReportFormat,
}

/// Outcome for one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub changed: bool,
    #[serde(flatten)]
    pub stats: ScrubStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Scrub a single file without touching it on disk
pub fn scrub_file(path: &Path, typescript: bool) -> ScrubResult<(FileReport, String)> {
    let source = read_source(path)?;
    let (output, stats) = scrub_source(&source, source_type_for(path, typescript)).map_err(
        |err| match err {
            ScrubError::Parse { message } => ScrubError::Parse {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        },
    )?;

    let report = FileReport {
        path: path.to_path_buf(),
        changed: output != source,
        stats,
        output: None,
    };
    Ok((report, output))
}

/// Run the scrub command
pub fn scrub(args: &ScrubArgs) -> ScrubResult<()> {
    // Every file must parse before anything is written
    let results: Vec<(FileReport, String)> = args
        .inputs
        .par_iter()
        .map(|path| scrub_file(path, args.typescript))
        .collect::<ScrubResult<_>>()?;

    let mut reports = Vec::with_capacity(results.len());
    let mut total = ScrubStats::default();
    for (mut report, output) in results {
        total.merge(&report.stats);

        match args.mode {
            OutputMode::Print => match args.format {
                ReportFormat::Text => {
                    if args.inputs.len() > 1 {
                        println!("// ==> {} <==", report.path.display());
                    }
                    write_output(&output, None)?;
                }
                ReportFormat::Json => report.output = Some(output),
            },
            OutputMode::Write => {
                if report.changed {
                    log::info!("Rewriting {}", report.path.display());
                    write_output(&output, Some(&report.path))?;
                }
            }
            OutputMode::Check => {
                if report.changed {
                    log::info!("{} contains Flow comments", report.path.display());
                }
            }
        }
        reports.push(report);
    }

    log::debug!("Scrubbed {} file(s): {:?}", reports.len(), total);

    match (args.format, args.mode) {
        (ReportFormat::Json, _) => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|err| ScrubError::Io(err.to_string()))?;
            println!("{}", json);
        }
        (ReportFormat::Text, OutputMode::Print) => {}
        (ReportFormat::Text, _) => {
            for report in reports.iter().filter(|report| report.changed) {
                println!("{}", summary_line(report, args.mode));
            }
        }
    }

    let changed = reports.iter().filter(|report| report.changed).count();
    if args.mode == OutputMode::Check && changed > 0 {
        return Err(ScrubError::Check { count: changed });
    }

    Ok(())
}

fn summary_line(report: &FileReport, mode: OutputMode) -> String {
    let verb = match mode {
        OutputMode::Check => "would scrub",
        _ => "scrubbed",
    };
    format!(
        "{} {}: {} removed, {} rewritten, {} @noflow translated",
        verb,
        report.path.display(),
        report.stats.comments_removed,
        report.stats.comments_rewritten,
        report.stats.directives_translated
    )
}
