use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;

/// Routes `tracing` output to a daily log file under the configured log
/// directory. The terminal belongs to the UI, so nothing goes to stderr.
///
/// Keep the returned guard alive until shutdown so buffered lines are flushed.
pub fn init(config: &AppConfig) -> Result<WorkerGuard> {
    let appender = rolling::daily(config.log_dir(), "bookshelf.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
