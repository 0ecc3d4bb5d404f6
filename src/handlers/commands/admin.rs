//! Admin command handlers

use teloxide::{Bot, types::ChatId, prelude::*};
use tracing::{info, debug, warn};
use crate::handlers::replies;
use crate::utils::errors::{PartnerChatError, Result};
use crate::services::ServiceFactory;

/// Handle /premium <telegram_id> [on|off]
pub async fn handle_premium(
    bot: Bot,
    chat_id: ChatId,
    admin_id: i64,
    args: &str,
    services: &ServiceFactory,
) -> Result<()> {
    debug!(admin_id = admin_id, args = args, "Processing /premium command");

    if services.auth_service.require_admin(admin_id).is_err() {
        bot.send_message(chat_id, replies::ADMINS_ONLY).await?;
        return Ok(());
    }

    let Some((telegram_id, premium)) = parse_premium_args(args) else {
        bot.send_message(chat_id, replies::PREMIUM_USAGE).await?;
        return Ok(());
    };

    match services.user_service.set_premium(telegram_id, premium, admin_id).await {
        Ok(user) => {
            bot.send_message(chat_id, replies::premium_changed(user.telegram_id, user.premium)).await?;
        }
        Err(PartnerChatError::UserNotFound { user_id }) => {
            warn!(admin_id = admin_id, telegram_id = user_id, "Premium change for unknown user");
            bot.send_message(chat_id, replies::USER_NOT_FOUND).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Handle /stats
pub async fn handle_stats(
    bot: Bot,
    chat_id: ChatId,
    admin_id: i64,
    services: &ServiceFactory,
) -> Result<()> {
    if services.auth_service.require_admin(admin_id).is_err() {
        bot.send_message(chat_id, replies::ADMINS_ONLY).await?;
        return Ok(());
    }

    let stats = services.user_service.statistics().await?;
    bot.send_message(chat_id, replies::stats(&stats)).await?;

    info!(admin_id = admin_id, "Admin viewed statistics");

    Ok(())
}

/// Parse `<telegram_id> [on|off]`; premium is granted when the switch is omitted
fn parse_premium_args(args: &str) -> Option<(i64, bool)> {
    let mut parts = args.split_whitespace();
    let telegram_id = parts.next()?.parse::<i64>().ok()?;

    let premium = match parts.next().map(str::to_lowercase).as_deref() {
        None | Some("on") => true,
        Some("off") => false,
        Some(_) => return None,
    };

    if parts.next().is_some() {
        return None;
    }

    Some((telegram_id, premium))
}
