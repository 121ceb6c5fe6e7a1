//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, SwingRegError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_email_config(&settings.email)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(SwingRegError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(SwingRegError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SwingRegError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(SwingRegError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(SwingRegError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.admin_email.is_empty() || config.admin_password.is_empty() {
        return Err(SwingRegError::Config(
            "Admin credentials are required".to_string(),
        ));
    }

    if config.jwt_secret.is_empty() {
        return Err(SwingRegError::Config("JWT secret is required".to_string()));
    }

    if config.token_expiry_hours <= 0 {
        return Err(SwingRegError::Config(
            "Token expiry must be greater than 0 hours".to_string(),
        ));
    }

    Ok(())
}

/// Validate email configuration
fn validate_email_config(config: &super::EmailConfig) -> Result<()> {
    if config.smtp_host.is_empty() {
        return Err(SwingRegError::Config("SMTP host is required".to_string()));
    }

    if config.from_address.is_empty() {
        return Err(SwingRegError::Config(
            "Email sender address is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SwingRegError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SwingRegError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
