//! Help command handler

use teloxide::{Bot, types::ChatId, prelude::*, utils::command::BotCommands};
use crate::handlers::commands::Command;
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, chat_id: ChatId) -> Result<()> {
    bot.send_message(chat_id, Command::descriptions().to_string()).await?;
    Ok(())
}
