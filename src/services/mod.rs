//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod matchmaking;
pub mod user;

// Re-export commonly used services
pub use auth::AuthService;
pub use matchmaking::{MatchmakingService, FindOutcome, RelayTarget};
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::middleware::RelayRateLimiter;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub matchmaking_service: MatchmakingService,
    pub auth_service: AuthService,
    pub relay_limiter: RelayRateLimiter,
    /// Target of the "Mini App" menu button
    pub mini_app_url: String,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, database: &DatabaseService) -> Self {
        Self {
            user_service: UserService::new(database.users.clone()),
            matchmaking_service: MatchmakingService::new(database.users.clone()),
            auth_service: AuthService::new(settings),
            relay_limiter: RelayRateLimiter::new(&settings.relay, settings.bot.admin_ids.clone()),
            mini_app_url: settings.features.mini_app_url.clone(),
        }
    }
}
