//! User-facing reply texts

use crate::models::region::Region;
use crate::models::user::UserStats;

pub const ALREADY_CONNECTED: &str = "You are already connected.";
pub const PARTNER_FOUND: &str = "✅ Partner found! Start chatting.";
pub const PARTNER_UNREACHABLE: &str = "Partner unreachable. Try again.";
pub const WAITING_FOR_PARTNER: &str = "⏳ Waiting for a partner in your region…";
pub const NOT_IN_CHAT: &str = "You are not in a chat.";
pub const PARTNER_LEFT: &str = "❌ Your partner left.";
pub const LEFT_CHAT: &str = "❌ Left chat.";
pub const PARTNER_SKIPPED: &str = "🔄 Your partner skipped you.";
pub const SEARCHING_NEW_PARTNER: &str = "🔎 Searching new partner…";
pub const PREMIUM_ONLY: &str = "⚠️ Premium only.";
pub const DELIVERY_FAILED: &str = "Delivery failed. Try Next.";
pub const PARTNER_MISSING: &str = "Partner missing. Press Find.";
pub const USE_BUTTONS: &str = "Use the buttons to find a partner.";
pub const SLOW_DOWN: &str = "⏳ Slow down a little.";
pub const ADMINS_ONLY: &str = "⛔ Admins only.";
pub const PREMIUM_USAGE: &str = "Usage: /premium <telegram_id> [on|off]";
pub const USER_NOT_FOUND: &str = "User not found.";

pub fn welcome(first_name: &str, region: &str) -> String {
    format!("Welcome {}!\nRegion: {}\nUse buttons below.", first_name, region)
}

pub fn region_prompt() -> String {
    format!("Send the region name from: {}", Region::options())
}

pub fn invalid_region() -> String {
    format!("Invalid region. Options: {}", Region::options())
}

pub fn region_updated(region: &str) -> String {
    format!("✅ Region updated to {}", region)
}

pub fn premium_changed(telegram_id: i64, premium: bool) -> String {
    if premium {
        format!("⭐ User {} is now premium.", telegram_id)
    } else {
        format!("User {} is no longer premium.", telegram_id)
    }
}

pub fn stats(stats: &UserStats) -> String {
    format!(
        "📊 Users: {}\nPremium: {}\nIn chat: {}\nSearching: {}",
        stats.total, stats.premium, stats.paired, stats.searching
    )
}
