//! Start command handler

use teloxide::{Bot, types::Message, prelude::*};
use tracing::{info, debug};
use crate::handlers::{keyboards::main_menu, replies};
use crate::utils::errors::{PartnerChatError, Result};
use crate::services::ServiceFactory;

/// Handle /start command
///
/// Registers the user on first contact and shows the main menu.
pub async fn handle_start(bot: Bot, msg: &Message, services: &ServiceFactory) -> Result<()> {
    let from = msg.from.as_ref().ok_or_else(|| {
        PartnerChatError::InvalidInput("No user in message".to_string())
    })?;

    let telegram_id = from.id.0 as i64;
    debug!(telegram_id = telegram_id, chat_id = ?msg.chat.id, "Processing /start command");

    let user = services
        .user_service
        .register_or_get(telegram_id, from.language_code.as_deref())
        .await?;

    bot.send_message(msg.chat.id, replies::welcome(&from.first_name, &user.region))
        .reply_markup(main_menu(user.premium, &services.mini_app_url))
        .await?;

    info!(telegram_id = telegram_id, region = %user.region, "User started the bot");

    Ok(())
}
