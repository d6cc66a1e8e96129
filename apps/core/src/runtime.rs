use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config;
use crate::error::RuntimeError;
use crate::trace::{self, ReplayReport};

/// Replays a recorded results-container mutation trace and prints the
/// reconstructed entry order for each session.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "resultchain-core", version)]
pub struct CliOptions {
    /// Trace file (.json or .json5)
    #[arg(long)]
    pub trace: PathBuf,

    /// Config file; defaults are used when it does not exist
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print one JSON report per line instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Skip installing the log subscriber
    #[arg(long)]
    pub no_log: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, RuntimeError> {
    let argv = std::iter::once("resultchain-core".to_string()).chain(args.iter().cloned());
    CliOptions::try_parse_from(argv).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => RuntimeError::Info(e.to_string()),
        _ => RuntimeError::Usage(e.to_string()),
    })
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config.as_deref())?;
    let _logging = if options.no_log {
        None
    } else {
        Some(crate::logging::init(&config.log_filter).map_err(RuntimeError::Logging)?)
    };

    tracing::info!(
        trace = %options.trace.display(),
        config_path = %config.config_path.display(),
        second_root = ?config.second_root,
        "replay starting"
    );

    let trace = trace::load(&options.trace)?;
    let reports = trace::replay(&trace, &config);
    for line in render_reports(&reports, options.json)? {
        println!("{line}");
    }
    Ok(())
}

pub fn render_reports(reports: &[ReplayReport], json: bool) -> Result<Vec<String>, RuntimeError> {
    reports
        .iter()
        .map(|report| {
            if json {
                serde_json::to_string(report).map_err(RuntimeError::Report)
            } else {
                Ok(format!(
                    "{}: {} (pending={} segments={})",
                    report.container,
                    report.linked.join(" -> "),
                    report.pending,
                    report.segments
                ))
            }
        })
        .collect()
}
