//! User service implementation
//!
//! This service handles user registration, region preferences and premium
//! status.

use tracing::{info, debug};
use crate::database::repositories::UserRepository;
use crate::models::region::Region;
use crate::models::user::{User, UserStats};
use crate::utils::errors::{PartnerChatError, Result};

/// User service for managing user operations
#[derive(Debug, Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Register a new user or get existing user.
    ///
    /// New users start in the region inferred from their client language.
    pub async fn register_or_get(&self, telegram_id: i64, language_code: Option<&str>) -> Result<User> {
        debug!(telegram_id = telegram_id, language_code = ?language_code, "Registering or fetching user");
        self.user_repository.get_or_create(telegram_id, language_code).await
    }

    /// Get user by Telegram ID
    pub async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        debug!(telegram_id = telegram_id, "Getting user by Telegram ID");
        self.user_repository.find_by_telegram_id(telegram_id).await
    }

    /// Set the user's region from a region name typed by the user
    pub async fn update_region(&self, user: &User, region_name: &str) -> Result<User> {
        let region: Region = region_name.parse()?;
        let updated = self.user_repository.set_region(user.id, region).await?;
        info!(telegram_id = user.telegram_id, region = %region, "User region updated");

        Ok(updated)
    }

    /// Grant or revoke premium for a Telegram account
    pub async fn set_premium(&self, telegram_id: i64, premium: bool, admin_id: i64) -> Result<User> {
        let existing_user = self.user_repository.find_by_telegram_id(telegram_id).await?
            .ok_or(PartnerChatError::UserNotFound { user_id: telegram_id })?;

        let user = self.user_repository.set_premium(existing_user.id, premium).await?;
        info!(telegram_id = telegram_id, premium = premium, admin_id = admin_id, "Premium status changed");

        Ok(user)
    }

    /// Get user statistics
    pub async fn statistics(&self) -> Result<UserStats> {
        debug!("Getting user statistics");
        self.user_repository.stats().await
    }
}
