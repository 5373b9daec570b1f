//! Tracing setup.
//!
//! The server logs to stdout and, when `logging.file` is set, appends the
//! same lines to that file. Client commands keep stdout for their output and
//! log to stderr.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Targets that are chatty at debug level and rarely useful here.
const QUIET_TARGETS: &[&str] = &["hyper=info", "hyper_util=info", "reqwest=info", "h2=info"];

fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn build_filter(level: &str) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env().add_directive(parse_level(level).into());
    for target in QUIET_TARGETS {
        if let Ok(directive) = target.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Initialize logging for `serve`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let writer = if config.file.trim().is_empty() {
        BoxMakeWriter::new(std::io::stdout)
    } else {
        let file = Arc::new(open_log_file(Path::new(&config.file))?);
        BoxMakeWriter::new(std::io::stdout.and(file))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(build_filter(&config.level))
        .init();

    Ok(())
}

/// Initialize stderr-only logging for client commands.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(build_filter(level))
        .init();
}
