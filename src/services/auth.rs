//! Authentication service implementation
//!
//! Bot administrators are configured by Telegram user ID. Admins manage
//! premium status and can read usage statistics.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;
use crate::config::settings::Settings;
use crate::utils::errors::{PartnerChatError, Result};

/// Authentication service for admin-only operations
#[derive(Debug, Clone)]
pub struct AuthService {
    admin_ids: Arc<HashSet<i64>>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: &Settings) -> Self {
        Self {
            admin_ids: Arc::new(settings.bot.admin_ids.iter().copied().collect()),
        }
    }

    /// Check if user is a bot admin
    pub fn is_bot_admin(&self, telegram_id: i64) -> bool {
        self.admin_ids.contains(&telegram_id)
    }

    /// Require bot admin rights or return error
    pub fn require_admin(&self, telegram_id: i64) -> Result<()> {
        if self.is_bot_admin(telegram_id) {
            return Ok(());
        }

        warn!(telegram_id = telegram_id, "Non-admin attempted an admin command");
        Err(PartnerChatError::PermissionDenied(
            format!("User {} is not a bot admin", telegram_id)
        ))
    }
}
