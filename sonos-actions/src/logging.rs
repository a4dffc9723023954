//! Logging setup
//!
//! The engine only emits `tracing` events. Programs embedding it pick how
//! those events are shown: not at all, compact lines on stderr, or verbose
//! output with source locations.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No output; command output stays clean
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose diagnostics for debugging
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid log level '{0}': use one of none, critical, error, warn, info, debug")]
    InvalidLevel(String),
}

/// Initialize logging with the specified mode
///
/// Call once, before running any actions.
///
/// # Environment Variables
///
/// - `SONOS_LOG_LEVEL`: filter directive, e.g. `debug` or `sonos_actions::follow=info`
/// - `RUST_LOG`: used when `SONOS_LOG_LEVEL` is not set
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let default_level = match mode {
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => "info",
        LoggingMode::Debug => "debug",
    };
    init_with_filter(mode, create_env_filter(default_level))
}

/// Initialize logging from a level name
///
/// Accepts `none`, `critical`, `error`, `warn`, `info` and `debug`, ignoring
/// case. `none` installs nothing; `critical` maps to `error`, the most severe
/// level `tracing` has. The level overrides the environment.
pub fn set_log_level(name: &str) -> Result<(), LoggingError> {
    match level_directive(name)? {
        None => Ok(()),
        Some(level) => {
            let mode = if level == "debug" {
                LoggingMode::Debug
            } else {
                LoggingMode::Development
            };
            init_with_filter(mode, EnvFilter::new(level))
        }
    }
}

/// Maps a level name to a filter directive; `None` means logging off
fn level_directive(name: &str) -> Result<Option<&'static str>, LoggingError> {
    match name.to_lowercase().as_str() {
        "none" => Ok(None),
        "critical" | "error" => Ok(Some("error")),
        "warn" | "warning" => Ok(Some("warn")),
        "info" => Ok(Some("info")),
        "debug" => Ok(Some("debug")),
        _ => Err(LoggingError::InvalidLevel(name.to_string())),
    }
}

fn init_with_filter(mode: LoggingMode, filter: EnvFilter) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
        LoggingMode::Debug => Registry::default()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init()
            .map_err(|e| LoggingError::TracingInit(e.to_string())),
    }
}

/// First `SONOS_LOG_LEVEL`, then `RUST_LOG`, then `default_level`
fn create_env_filter(default_level: &str) -> EnvFilter {
    std::env::var("SONOS_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}
