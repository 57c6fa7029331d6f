//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{StudioError, Result};
use super::settings::{DEFAULT_JWT_SECRET, Environment, MAX_TOKEN_TTL_HOURS};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth, settings.app.environment)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(StudioError::Config(
            "Server host is required".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(StudioError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(StudioError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(StudioError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate credential and token configuration
fn validate_auth_config(config: &super::AuthConfig, environment: Environment) -> Result<()> {
    if config.token_ttl_hours <= 0 {
        return Err(StudioError::Config(
            "Token TTL must be greater than 0".to_string()
        ));
    }

    if config.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
        return Err(StudioError::Config(
            format!("Token TTL must be at most {} hours", MAX_TOKEN_TTL_HOURS)
        ));
    }

    if !(4..=31).contains(&config.bcrypt_cost) {
        return Err(StudioError::Config(
            format!("Invalid bcrypt cost: {}. Must be between 4 and 31", config.bcrypt_cost)
        ));
    }

    if !environment.is_development()
        && (config.jwt_secret.is_empty() || config.jwt_secret == DEFAULT_JWT_SECRET)
    {
        return Err(StudioError::Config(
            format!("A non-default JWT secret is required in {}", environment)
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(StudioError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(StudioError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(StudioError::Config(
            format!("Invalid log format: {}. Valid formats: {:?}", config.format, valid_formats)
        ));
    }

    Ok(())
}
