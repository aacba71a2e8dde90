//! Error types for the Telegram client

/// Telegram client error type
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    ApiError(String),
}

/// Result type alias for Telegram operations
pub type Result<T> = std::result::Result<T, TelegramError>;

impl TelegramError {
    pub fn api<S: Into<String>>(msg: S) -> Self {
        TelegramError::ApiError(msg.into())
    }
}
