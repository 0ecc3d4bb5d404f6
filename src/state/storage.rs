//! State storage implementation
//!
//! This module handles persistence of conversation state using Redis,
//! including serialization, deserialization and expiration.

use redis::AsyncCommands;
use tracing::{debug, warn, error};
use crate::utils::errors::Result;
use crate::config::RedisConfig;
use super::context::ConversationContext;

/// Contexts never get a Redis TTL shorter than this
const MIN_TTL_SECONDS: i64 = 60;

/// Redis-based state storage manager
#[derive(Clone)]
pub struct StateStorage {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl StateStorage {
    /// Create a new state storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save conversation context to Redis
    pub async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let key = context_key(&self.config.prefix, context.user_id);
        debug!(user_id = context.user_id, key = %key, scenario = ?context.scenario,
               step = ?context.step, "Saving context to Redis");

        let serialized = serde_json::to_string(context)?;
        let ttl_seconds = context_ttl_seconds(context, self.config.ttl_seconds);

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = context.user_id, ttl_seconds = ttl_seconds, "Context saved to Redis successfully");
                Ok(())
            },
            Err(e) => {
                error!(user_id = context.user_id, error = %e, "Failed to save context to Redis");
                Err(e.into())
            }
        }
    }

    /// Load conversation context from Redis
    pub async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let key = context_key(&self.config.prefix, user_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&key).await?;
        let Some(data) = serialized else {
            debug!(user_id = user_id, "No context found in Redis");
            return Ok(None);
        };

        let context: ConversationContext = match serde_json::from_str(&data) {
            Ok(context) => context,
            Err(e) => {
                warn!(user_id = user_id, error = %e, "Discarding unreadable context");
                self.delete_context(user_id).await?;
                return Ok(None);
            }
        };

        if context.is_expired() {
            debug!(user_id = user_id, expires_at = ?context.expires_at, "Context has expired, removing");
            self.delete_context(user_id).await?;
            return Ok(None);
        }

        Ok(Some(context))
    }

    /// Delete conversation context from Redis
    pub async fn delete_context(&self, user_id: i64) -> Result<()> {
        let key = context_key(&self.config.prefix, user_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(user_id = user_id, deleted = deleted, "Deleted context");

        Ok(())
    }

    /// Check if context exists for a user
    pub async fn context_exists(&self, user_id: i64) -> Result<bool> {
        let key = context_key(&self.config.prefix, user_id);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

impl std::fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Get the Redis key for a user's context
fn context_key(prefix: &str, user_id: i64) -> String {
    format!("{}context:{}", prefix, user_id)
}

/// Redis TTL for a context: its own expiry when set, otherwise the default
fn context_ttl_seconds(context: &ConversationContext, default_ttl: u64) -> u64 {
    match context.expires_at {
        Some(expires_at) => {
            let remaining = (expires_at - chrono::Utc::now()).num_seconds();
            std::cmp::max(remaining, MIN_TTL_SECONDS) as u64
        }
        None => default_ttl,
    }
}
