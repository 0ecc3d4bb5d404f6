//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, UserRepository};
use crate::utils::errors::PartnerChatError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check that the database answers queries
    pub async fn is_healthy(&self) -> bool {
        match super::health_check(&self.pool).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<(), PartnerChatError> {
        super::run_migrations(&self.pool).await
    }
}
