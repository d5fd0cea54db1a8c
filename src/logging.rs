//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. an explicit level (the CLI `--log-level` flag)
//! 2. the `CPM_SCHEDULE_LOG` environment variable (any `EnvFilter` directive)
//! 3. default to `info`

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub const LOG_ENV: &str = "CPM_SCHEDULE_LOG";

#[derive(Debug, Error)]
#[error("failed to install log subscriber: {0}")]
pub struct LoggingError(String);

/// Install the global subscriber. Output goes to stderr so stdout stays
/// clean for exported data. Fails if a subscriber is already installed.
pub fn init_logging(level: Option<Level>) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|err| LoggingError(err.to_string()))
}

fn build_filter(level: Option<Level>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::default().add_directive(LevelFilter::from_level(level).into()),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .with_env_var(LOG_ENV)
            .from_env_lossy(),
    }
}
