//! Rate limiting middleware
//!
//! Limits how fast a user can push messages through to their chat partner.

use std::num::NonZeroU32;
use std::sync::Arc;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};
use crate::config::RelayConfig;
use crate::utils::errors::{PartnerChatError, Result};

/// Per-user limiter for relayed partner messages
#[derive(Clone)]
pub struct RelayRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<i64>>,
    admin_exempt: bool,
    admin_ids: Arc<Vec<i64>>,
}

impl RelayRateLimiter {
    /// Create a new limiter from relay settings
    pub fn new(config: &RelayConfig, admin_ids: Vec<i64>) -> Self {
        let per_minute = NonZeroU32::new(config.messages_per_minute).unwrap_or(NonZeroU32::MIN);
        let mut quota = Quota::per_minute(per_minute);
        if let Some(burst) = NonZeroU32::new(config.burst) {
            quota = quota.allow_burst(burst);
        }

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            admin_exempt: config.admin_exempt,
            admin_ids: Arc::new(admin_ids),
        }
    }

    /// Check whether `telegram_id` may relay another message right now
    pub fn check(&self, telegram_id: i64) -> Result<()> {
        if self.admin_exempt && self.admin_ids.contains(&telegram_id) {
            debug!(telegram_id = telegram_id, "Admin user exempt from rate limiting");
            return Ok(());
        }

        self.limiter.check_key(&telegram_id).map_err(|_| {
            warn!(telegram_id = telegram_id, "Relay rate limit exceeded");
            PartnerChatError::RateLimitExceeded
        })
    }

    /// Forget users whose buckets have fully refilled
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(tracked_users = self.limiter.len(), "Relay rate limiter cleaned up");
    }
}

impl std::fmt::Debug for RelayRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayRateLimiter")
            .field("admin_exempt", &self.admin_exempt)
            .field("admin_ids", &self.admin_ids)
            .finish_non_exhaustive()
    }
}
