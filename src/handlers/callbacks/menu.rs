//! Main menu actions
//!
//! Shared by the inline buttons and their command aliases (`/find`, `/next`,
//! `/stop`, `/region`).

use teloxide::{Bot, types::ChatId, prelude::*};
use tracing::{info, debug, warn};
use crate::handlers::{keyboards::main_menu, replies};
use crate::database::UnpairOutcome;
use crate::models::user::User;
use crate::services::{ServiceFactory, FindOutcome};
use crate::state::{ConversationContext, StateStorage};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// "Find Partner": pair with someone waiting in the same region or join the pool
pub async fn find_partner(bot: &Bot, chat_id: ChatId, user: &User, services: &ServiceFactory) -> Result<()> {
    log_user_action(user.telegram_id, "find", None);

    match services.matchmaking_service.find_partner(user).await? {
        FindOutcome::AlreadyConnected => {
            bot.send_message(chat_id, replies::ALREADY_CONNECTED).await?;
        }
        FindOutcome::Waiting => {
            bot.send_message(chat_id, replies::WAITING_FOR_PARTNER).await?;
        }
        FindOutcome::Matched { me, partner } => {
            bot.send_message(chat_id, replies::PARTNER_FOUND).await?;

            if let Err(e) = bot.send_message(ChatId(partner.telegram_id), replies::PARTNER_FOUND).await {
                warn!(user_id = me.id, partner_id = partner.id, error = %e, "Could not notify new partner");
                services.matchmaking_service.rollback_match(&me, &partner).await?;
                bot.send_message(chat_id, replies::PARTNER_UNREACHABLE).await?;
            } else {
                info!(user_id = me.id, partner_id = partner.id, "Users paired");
            }
        }
    }

    Ok(())
}

/// "Stop Chat": leave the partner (or cancel a search)
pub async fn stop_chat(bot: &Bot, chat_id: ChatId, user: &User, services: &ServiceFactory) -> Result<()> {
    log_user_action(user.telegram_id, "stop", None);

    match services.matchmaking_service.leave(user).await? {
        UnpairOutcome::NotPaired => {
            bot.send_message(chat_id, replies::NOT_IN_CHAT).await?;
        }
        UnpairOutcome::Left { partner } => {
            if let Some(partner) = partner {
                notify_quietly(bot, &partner, replies::PARTNER_LEFT).await;
            }
            bot.send_message(chat_id, replies::LEFT_CHAT)
                .reply_markup(main_menu(user.premium, &services.mini_app_url))
                .await?;
        }
    }

    Ok(())
}

/// "Next Partner": leave the current partner, then search again
pub async fn next_partner(bot: &Bot, chat_id: ChatId, user: &User, services: &ServiceFactory) -> Result<()> {
    log_user_action(user.telegram_id, "next", None);

    if let UnpairOutcome::Left { partner: Some(partner) } = services.matchmaking_service.leave(user).await? {
        notify_quietly(bot, &partner, replies::PARTNER_SKIPPED).await;
    }

    bot.send_message(chat_id, replies::SEARCHING_NEW_PARTNER).await?;
    find_partner(bot, chat_id, user, services).await
}

/// "Set Region": premium users are asked to type a region name
pub async fn request_region(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    state_storage: &StateStorage,
) -> Result<()> {
    log_user_action(user.telegram_id, "setregion", None);

    if !user.premium {
        bot.send_message(chat_id, replies::PREMIUM_ONLY).await?;
        return Ok(());
    }

    state_storage.save_context(&ConversationContext::region_selection(user.telegram_id)).await?;
    bot.send_message(chat_id, replies::region_prompt()).await?;

    Ok(())
}

/// Best-effort message to a (former) partner; failures are only logged
async fn notify_quietly(bot: &Bot, partner: &User, text: &str) {
    if let Err(e) = bot.send_message(ChatId(partner.telegram_id), text).await {
        debug!(partner_id = partner.id, error = %e, "Partner notification not delivered");
    }
}
