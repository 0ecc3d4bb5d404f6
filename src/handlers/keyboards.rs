//! Inline keyboards and their callback data

use std::str::FromStr;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

/// Buttons of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Find,
    Next,
    Stop,
    SetRegion,
}

impl MenuAction {
    pub fn callback_data(&self) -> &'static str {
        match self {
            MenuAction::Find => "find",
            MenuAction::Next => "next",
            MenuAction::Stop => "stop",
            MenuAction::SetRegion => "setregion",
        }
    }
}

impl FromStr for MenuAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "find" => Ok(MenuAction::Find),
            "next" => Ok(MenuAction::Next),
            "stop" => Ok(MenuAction::Stop),
            "setregion" => Ok(MenuAction::SetRegion),
            _ => Err(()),
        }
    }
}

/// Main menu. "Set Region" is only offered to premium users.
pub fn main_menu(premium: bool, mini_app_url: &str) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![InlineKeyboardButton::callback("🟢 Find Partner", MenuAction::Find.callback_data())],
        vec![InlineKeyboardButton::callback("🔄 Next Partner", MenuAction::Next.callback_data())],
        vec![InlineKeyboardButton::callback("🔴 Stop Chat", MenuAction::Stop.callback_data())],
    ];

    if premium {
        rows.push(vec![InlineKeyboardButton::callback("🌍 Set Region", MenuAction::SetRegion.callback_data())]);
    }

    match url::Url::parse(mini_app_url) {
        Ok(url) => rows.push(vec![InlineKeyboardButton::url("🧩 Mini App", url)]),
        Err(e) => warn!(url = mini_app_url, error = %e, "Skipping Mini App button"),
    }

    InlineKeyboardMarkup::new(rows)
}
