use std::path::Path;

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "graph-insights.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `level`. With `log_dir` set, output goes to a daily
/// rolling file and the returned guard must be held until shutdown.
pub fn init_tracing(level: Option<&str>, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = level.unwrap_or("info");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

            Ok(Some(guard))
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .try_init()
                .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

            Ok(None)
        }
    }
}
