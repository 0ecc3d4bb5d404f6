//! Integration test modules

mod matchmaking_test;
mod handlers_test;
