//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod start;
pub mod help;
pub mod admin;

use teloxide::{Bot, types::{Message, ChatId}, utils::command::BotCommands};
use tracing::debug;
use crate::handlers::callbacks::menu;
use crate::utils::errors::{PartnerChatError, Result};
use crate::services::ServiceFactory;
use crate::state::StateStorage;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "PartnerChat commands:")]
pub enum Command {
    #[command(description = "Start the bot and show the menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Find a chat partner")]
    Find,
    #[command(description = "Skip to the next partner")]
    Next,
    #[command(description = "Leave the current chat")]
    Stop,
    #[command(description = "Change your region (premium only)")]
    Region,
    #[command(description = "Grant or revoke premium (admin only)")]
    Premium(String),
    #[command(description = "Show bot statistics (admin only)")]
    Stats,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: &ServiceFactory,
    state_storage: &StateStorage,
) -> Result<()> {
    let from = msg.from.as_ref().ok_or_else(|| {
        PartnerChatError::InvalidInput("No user in message".to_string())
    })?;
    let telegram_id = from.id.0 as i64;
    let chat_id: ChatId = msg.chat.id;

    debug!(telegram_id = telegram_id, command = ?cmd, "Processing command");

    match cmd {
        Command::Start => start::handle_start(bot, &msg, services).await,
        Command::Help => help::handle_help(bot, chat_id).await,
        Command::Premium(args) => admin::handle_premium(bot, chat_id, telegram_id, &args, services).await,
        Command::Stats => admin::handle_stats(bot, chat_id, telegram_id, services).await,
        menu_alias => {
            let user = services
                .user_service
                .register_or_get(telegram_id, from.language_code.as_deref())
                .await?;

            match menu_alias {
                Command::Find => menu::find_partner(&bot, chat_id, &user, services).await,
                Command::Next => menu::next_partner(&bot, chat_id, &user, services).await,
                Command::Stop => menu::stop_chat(&bot, chat_id, &user, services).await,
                Command::Region => menu::request_region(&bot, chat_id, &user, state_storage).await,
                _ => Ok(()),
            }
        }
    }
}
