//! Bot API wire types
//!
//! Only the fields the bot reads are modeled; everything else in the API
//! payloads is ignored during deserialization.

use serde::Deserialize;

/// Standard Bot API response envelope
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// An incoming update from getUpdates
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// A message inside an update
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    /// Original sender, for forwards from visible accounts
    #[serde(default)]
    pub forward_from: Option<User>,
    /// Original chat, for forwards from channels
    #[serde(default)]
    pub forward_from_chat: Option<Chat>,
    /// Display name, for forwards from accounts that hide their identity
    #[serde(default)]
    pub forward_sender_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}
