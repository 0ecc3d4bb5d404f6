//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands and menu aliases
//! - Callback handlers for the inline main menu
//! - Message handlers for region input and partner relay

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod keyboards;
pub mod replies;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command};
pub use callbacks::handle_callback_query;
pub use messages::{handle_message, is_plain_text};
pub use keyboards::{MenuAction, main_menu};
