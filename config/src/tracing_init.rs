//! Tracing subscriber setup shared by binaries and examples.
//!
//! Reads `RUST_LOG` for the filter (falling back to the caller's default). When
//! `THOUGHT_TREE_LOG_FILE` is set, logs go to that file through a non-blocking writer;
//! otherwise to stderr so stdout stays free for program output.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const ENV_LOG_FILE: &str = "THOUGHT_TREE_LOG_FILE";

/// Keeps the file writer flushing; hold it until the program exits.
pub struct TracingGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(default_filter: &str) -> Result<TracingGuard, Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match std::env::var(ENV_LOG_FILE).ok().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let path = Path::new(&path);
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| format!("{ENV_LOG_FILE} has no file name: {}", path.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
            tracing::info!(path = %path.display(), "logging to file");
            Ok(TracingGuard { _file: Some(guard) })
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
            Ok(TracingGuard { _file: None })
        }
    }
}
