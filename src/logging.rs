//! tracing-subscriber setup for the command-line tool.
use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One short line per event
    #[default]
    Compact,
    /// JSON structured format
    Json,
}

/// Filter level for a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. Logs go to stderr so page output and
/// summaries on stdout stay clean. `RUST_LOG` overrides `verbosity`.
pub fn init(verbosity: u8, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .with_file(verbosity >= 3)
        .with_line_number(verbosity >= 3);

    let installed = match format {
        LogFormat::Compact => builder
            .with_ansi(std::io::stderr().is_terminal())
            .compact()
            .try_init(),
        LogFormat::Json => builder.with_ansi(false).json().try_init(),
    };
    installed.map_err(|e| Error::Config(format!("failed to initialize logging: {e}")))?;

    tracing::debug!(?format, verbosity, "logging initialized");
    Ok(())
}
