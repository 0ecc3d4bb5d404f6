//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the PartnerChat application.

use tracing::{info, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file appender on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "partnerchat.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.level.to_lowercase()))
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    guard
}

/// Log user actions with structured data
pub fn log_user_action(telegram_id: i64, action: &str, details: Option<&str>) {
    info!(
        telegram_id = telegram_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log pairing lifecycle events
pub fn log_match_event(event: &str, user_id: i64, partner_id: Option<i64>, region: &str) {
    info!(
        event = event,
        user_id = user_id,
        partner_id = partner_id,
        region = region,
        "Match event"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, duration_ms: u64) {
    debug!(
        operation = operation,
        duration_ms = duration_ms,
        "Database operation completed"
    );
}
