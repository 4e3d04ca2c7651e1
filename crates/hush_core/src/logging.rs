use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info,hush_ledger=debug,hush_core=debug";

/// Initializes console logging, plus a daily-rotated file log when a
/// directory is given. The returned guard must be kept alive for the
/// duration of the app so file writes get flushed.
pub fn init_logging(file_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .compact();

    match file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "hushmint");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so one
    // test exercises the file path end to end.
    #[test]
    fn file_logging_creates_the_directory_and_returns_a_guard() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let logs_dir = tmp.path().join("nested").join("logs");
        assert!(!logs_dir.exists());

        let guard = init_logging(Some(&logs_dir)).unwrap();
        assert!(logs_dir.exists());
        assert!(guard.is_some());

        tracing::info!("log file smoke line");
        drop(guard);
        let entries: Vec<_> = std::fs::read_dir(&logs_dir).unwrap().collect();
        assert!(!entries.is_empty(), "expected a rolling log file");
    }

    #[test]
    fn env_filter_fallback_parses() {
        let filters = [DEFAULT_FILTER, "info", "debug", "warn", "trace"];
        for f in &filters {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(f));
            drop(filter);
        }
    }
}
