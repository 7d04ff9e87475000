//! Logging utilities for the NextDoor service.
//!
//! All crates log through `tracing`; this module owns the subscriber setup so the
//! backend binary and the tests configure it the same way.

use nextdoor_config::LoggingConfig;
use std::str::FromStr;
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured on top of `nextdoor=<level>`. Uses `try_init`, so
/// calling it a second time (e.g. from several tests) is harmless.
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from configuration.
///
/// When `file_dir` is set, a daily rolling file (`nextdoor.log.YYYY-MM-DD`) is written in
/// addition to stdout. The returned guard must be held for the lifetime of the process,
/// otherwise buffered file output is lost.
pub fn init_from_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = Level::from_str(&config.level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{}', falling back to info", config.level);
        Level::INFO
    });

    let Some(dir) = config.file_dir.as_deref() else {
        init_with_level(level);
        return None;
    };

    let appender = tracing_appender::rolling::daily(dir, "nextdoor.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {} (file output in {})", level, dir);
    }
    Some(guard)
}

fn filter_for(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("nextdoor={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a degraded-but-recovered condition at the WARN level.
pub fn log_recovered<E: std::fmt::Display>(error: E, context: &str) {
    warn!("{} (continuing): {}", context, error);
}
