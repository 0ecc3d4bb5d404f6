//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::net::SocketAddr;
use crate::utils::errors::{PartnerChatError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_web_config(&settings.web)?;
    validate_relay_config(&settings.relay)?;
    validate_logging_config(&settings.logging)?;
    validate_features_config(&settings.features)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(PartnerChatError::Config(
            "Bot token is required (set BOT_TOKEN)".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PartnerChatError::Config(
            "Database URL is required (set DATABASE_URL)".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(PartnerChatError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PartnerChatError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PartnerChatError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

fn validate_web_config(config: &super::WebConfig) -> Result<()> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        PartnerChatError::Config(format!("Invalid web bind address '{}': {}", config.bind_address, e))
    })?;

    Ok(())
}

fn validate_relay_config(config: &super::RelayConfig) -> Result<()> {
    if config.messages_per_minute == 0 {
        return Err(PartnerChatError::Config(
            "Relay messages per minute must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    let level = config.level.to_lowercase();
    if !valid_levels.contains(&level.as_str()) {
        return Err(PartnerChatError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

fn validate_features_config(config: &super::FeaturesConfig) -> Result<()> {
    url::Url::parse(&config.mini_app_url).map_err(|e| {
        PartnerChatError::Config(format!("Invalid Mini App URL '{}': {}", config.mini_app_url, e))
    })?;

    Ok(())
}
