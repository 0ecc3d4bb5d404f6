//! Test helpers module
//!
//! Mock Telegram server, database setup and service wiring shared by the
//! integration tests.


pub use telegram_mock::*;
pub use database_helper::*;

use PartnerChat::config::Settings;
use PartnerChat::services::ServiceFactory;

pub const ADMIN_ID: i64 = 1000;

/// Settings used by handler tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = test_bot_token();
    settings.bot.admin_ids = vec![ADMIN_ID];
    settings.relay.messages_per_minute = 2;
    settings.relay.burst = 2;
    settings
}

pub fn test_services(db: &TestDatabase) -> ServiceFactory {
    ServiceFactory::new(&test_settings(), &db.service())
}
