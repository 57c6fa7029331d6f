//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the YogaStudio application.

use std::path::Path;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{StudioError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| StudioError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.format == "json" {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(path) if !path.is_empty() => {
            let path = Path::new(path);
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "yoga-studio.log".to_string());

            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking).boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| StudioError::Config(format!("Failed to install log subscriber: {}", e)))?;

    info!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(guard)
}

/// Log authentication events (login, registration, token rejection)
pub fn log_auth_event(user_id: Option<i64>, action: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            user_id = user_id,
            action = action,
            details = details,
            "Authentication event: success"
        );
    } else {
        warn!(
            user_id = user_id,
            action = action,
            details = details,
            "Authentication event: failure"
        );
    }
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<i64>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log a roster change
pub fn log_participation_change(session_id: i64, user_id: i64, action: &str) {
    info!(
        session_id = session_id,
        user_id = user_id,
        action = action,
        "Participation changed"
    );
}
