//! File logging setup.
//!
//! The TUI owns the terminal, so logs go to a daily-rolling file under
//! `$TASKDECK_HOME/logs/`. The filter comes from `TASKDECK_LOG`, falling back
//! to the config `log_level`.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TASKDECK_LOG";

const LOG_FILE_PREFIX: &str = "taskdeck.log";

/// Installs the global tracing subscriber.
///
/// The returned guard must be held for the life of the process so buffered
/// lines are flushed on exit.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), &config.log_level);

    // A subscriber may already be set (tests, embedding); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}

fn build_filter(env_value: Option<&str>, fallback: &str) -> EnvFilter {
    env_value
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_new(fallback).ok())
        .unwrap_or_else(|| EnvFilter::new(Config::DEFAULT_LOG_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_value_wins_over_config() {
        let filter = build_filter(Some("debug"), "warn");
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_blank_env_falls_back_to_config() {
        let filter = build_filter(Some("  "), "warn");
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_invalid_directives_fall_back_to_default() {
        let filter = build_filter(None, "taskdeck=loud");
        assert!(filter.to_string().contains("info"));
    }
}
