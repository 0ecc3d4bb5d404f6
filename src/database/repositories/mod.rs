//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;

// Re-export repositories
pub use user::{UserRepository, PairAttempt, UnpairOutcome};
