//! idbot Telegram - Bot API client
//!
//! Minimal typed client for the handful of Bot API methods the bot needs:
//! `getMe`, long-polling `getUpdates`, and `sendMessage` with HTML parsing.

mod client;
mod error;
mod types;

pub use client::TelegramClient;
pub use error::{Result, TelegramError};
pub use types::{Chat, Message, Update, User};
