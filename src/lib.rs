//! PartnerChat Telegram Bot
//!
//! A Telegram bot that pairs users of the same region for anonymous
//! one-to-one text chat. This library provides the matchmaking engine, the
//! Telegram handlers, Redis-backed conversation state and a small HTTP API for
//! the companion Mini App.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod utils;
pub mod middleware;
pub mod web;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PartnerChatError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::StateStorage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
