//! Middleware module
//!
//! Cross-cutting checks applied before handlers act on an update

pub mod rate_limit;

pub use rate_limit::RelayRateLimiter;
