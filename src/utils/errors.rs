//! Error handling for PartnerChat
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for PartnerChat application
#[derive(Error, Debug)]
pub enum PartnerChatError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for PartnerChat operations
pub type Result<T> = std::result::Result<T, PartnerChatError>;

impl PartnerChatError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PartnerChatError::Database(_) => false,
            PartnerChatError::Migration(_) => false,
            PartnerChatError::Telegram(_) => true,
            PartnerChatError::Redis(_) => true,
            PartnerChatError::Config(_) => false,
            PartnerChatError::ConfigSource(_) => false,
            PartnerChatError::PermissionDenied(_) => false,
            PartnerChatError::UserNotFound { .. } => false,
            PartnerChatError::Serialization(_) => false,
            PartnerChatError::Io(_) => true,
            PartnerChatError::RateLimitExceeded => true,
            PartnerChatError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PartnerChatError::Database(_) => ErrorSeverity::Critical,
            PartnerChatError::Migration(_) => ErrorSeverity::Critical,
            PartnerChatError::Config(_) | PartnerChatError::ConfigSource(_) => ErrorSeverity::Critical,
            PartnerChatError::PermissionDenied(_) => ErrorSeverity::Warning,
            PartnerChatError::RateLimitExceeded => ErrorSeverity::Warning,
            PartnerChatError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
