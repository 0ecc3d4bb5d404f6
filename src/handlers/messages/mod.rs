//! Message handlers module
//!
//! Handles plain text: region input during the region conversation and
//! relaying messages between partners.

use teloxide::{Bot, types::{Message, MessageEntityKind, ChatId}, prelude::*};
use tracing::{debug, warn};
use crate::handlers::{keyboards::main_menu, replies};
use crate::models::user::User;
use crate::services::{ServiceFactory, RelayTarget};
use crate::state::StateStorage;
use crate::utils::errors::{PartnerChatError, Result};
use crate::utils::logging::log_user_action;

/// Text that should reach the partner: not a command of any bot, known or not
pub fn is_plain_text(msg: &Message) -> bool {
    let Some(text) = msg.text() else {
        return false;
    };

    let has_command_entity = msg
        .entities()
        .is_some_and(|entities| entities.iter().any(|e| e.kind == MessageEntityKind::BotCommand));

    !text.starts_with('/') && !has_command_entity
}

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: &ServiceFactory,
    state_storage: &StateStorage,
) -> Result<()> {
    let (Some(from), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };

    if !is_plain_text(&msg) {
        debug!(chat_id = ?msg.chat.id, "Ignoring unhandled command");
        return Ok(());
    }

    let telegram_id = from.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(telegram_id = telegram_id, chat_id = ?chat_id, "Processing message");

    let user = services
        .user_service
        .register_or_get(telegram_id, from.language_code.as_deref())
        .await?;

    if let Some(context) = state_storage.load_context(telegram_id).await? {
        if context.is_awaiting_region() && user.premium {
            return handle_region_input(bot, chat_id, &user, text, services, state_storage).await;
        }

        warn!(
            telegram_id = telegram_id,
            scenario = ?context.scenario,
            step = ?context.step,
            "Dropping conversation the user can no longer continue"
        );
        state_storage.delete_context(telegram_id).await?;
    }

    relay_message(bot, chat_id, &user, text, services).await
}

/// Handle a region name typed during the region conversation
async fn handle_region_input(
    bot: Bot,
    chat_id: ChatId,
    user: &User,
    text: &str,
    services: &ServiceFactory,
    state_storage: &StateStorage,
) -> Result<()> {
    match services.user_service.update_region(user, text).await {
        Ok(updated) => {
            state_storage.delete_context(user.telegram_id).await?;
            log_user_action(user.telegram_id, "region_updated", Some(&updated.region));

            bot.send_message(chat_id, replies::region_updated(&updated.region))
                .reply_markup(main_menu(updated.premium, &services.mini_app_url))
                .await?;
        }
        Err(PartnerChatError::InvalidInput(_)) => {
            debug!(telegram_id = user.telegram_id, input = text, "Invalid region name");
            bot.send_message(chat_id, replies::invalid_region()).await?;
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Forward the text to the user's partner, or point at the menu
async fn relay_message(
    bot: Bot,
    chat_id: ChatId,
    user: &User,
    text: &str,
    services: &ServiceFactory,
) -> Result<()> {
    match services.matchmaking_service.relay_target(user).await? {
        RelayTarget::NotPaired => {
            bot.send_message(chat_id, replies::USE_BUTTONS)
                .reply_markup(main_menu(user.premium, &services.mini_app_url))
                .await?;
        }
        RelayTarget::Missing => {
            bot.send_message(chat_id, replies::PARTNER_MISSING).await?;
        }
        RelayTarget::Partner(partner) => {
            if services.relay_limiter.check(user.telegram_id).is_err() {
                bot.send_message(chat_id, replies::SLOW_DOWN).await?;
                return Ok(());
            }

            if let Err(e) = bot.send_message(ChatId(partner.telegram_id), text).await {
                warn!(user_id = user.id, partner_id = partner.id, error = %e, "Relay delivery failed");
                bot.send_message(chat_id, replies::DELIVERY_FAILED).await?;
            }
        }
    }

    Ok(())
}
