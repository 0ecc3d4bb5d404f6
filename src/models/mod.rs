//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod region;
pub mod user;

// Re-export commonly used models
pub use region::{Region, infer_region};
pub use user::{User, CreateUserRequest, UserProfile, UserStats};
