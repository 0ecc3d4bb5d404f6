//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use super::region::Region;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub region: String,
    pub premium: bool,
    /// In the waiting pool for a partner
    pub searching: bool,
    /// `users.id` of the current chat partner
    pub partner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_paired(&self) -> bool {
        self.partner_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub telegram_id: i64,
    pub region: Region,
    pub premium: bool,
}

/// Public projection served by the Mini App API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub region: String,
    pub premium: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            telegram_id: user.telegram_id,
            region: user.region.clone(),
            premium: user.premium,
        }
    }
}

/// Aggregate counters for the admin `/stats` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserStats {
    pub total: i64,
    pub premium: i64,
    pub paired: i64,
    pub searching: i64,
}
