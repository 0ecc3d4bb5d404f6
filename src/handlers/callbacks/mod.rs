//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

pub mod menu;

use teloxide::{Bot, types::{CallbackQuery, ChatId}, prelude::*};
use tracing::{debug, warn};
use crate::handlers::keyboards::MenuAction;
use crate::services::ServiceFactory;
use crate::state::StateStorage;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: &ServiceFactory,
    state_storage: &StateStorage,
) -> Result<()> {
    let telegram_id = query.from.id.0 as i64;

    // Answer the callback query first to remove loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = ?query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };

    let Ok(action) = data.parse::<MenuAction>() else {
        debug!(telegram_id = telegram_id, callback_data = %data, "Ignoring unknown callback data");
        return Ok(());
    };

    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(telegram_id));

    let user = services
        .user_service
        .register_or_get(telegram_id, query.from.language_code.as_deref())
        .await?;

    debug!(telegram_id = telegram_id, action = ?action, "Dispatching menu action");

    match action {
        MenuAction::Find => menu::find_partner(&bot, chat_id, &user, services).await,
        MenuAction::Next => menu::next_partner(&bot, chat_id, &user, services).await,
        MenuAction::Stop => menu::stop_chat(&bot, chat_id, &user, services).await,
        MenuAction::SetRegion => menu::request_region(&bot, chat_id, &user, state_storage).await,
    }
}
