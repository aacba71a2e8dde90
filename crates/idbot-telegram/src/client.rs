//! Bot API HTTP client

use crate::error::{Result, TelegramError};
use crate::types::{ApiResponse, Message, Update, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Request body for sendMessage
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
}

/// Request body for getUpdates
#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u32,
}

/// Telegram Bot API client
pub struct TelegramClient {
    token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Create a client for the production Bot API
    pub fn new(token: String) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE.to_string())
    }

    /// Create a client against a custom API base URL (useful for testing)
    pub fn with_api_base(token: String, api_base: String) -> Self {
        Self {
            token,
            api_base,
            client: reqwest::Client::new(),
        }
    }

    /// URL for a Bot API method
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// POST a method call and unwrap the response envelope
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!("calling Telegram API method {}", method);
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        unwrap_envelope(response).await
    }

    /// Fetch the bot's own identity
    pub async fn get_me(&self) -> Result<User> {
        debug!("calling Telegram API method getMe");
        let response = self.client.get(self.method_url("getMe")).send().await?;
        unwrap_envelope(response).await
    }

    /// Long-poll for updates at or after `offset`
    pub async fn get_updates(&self, offset: i64, timeout: u32) -> Result<Vec<Update>> {
        self.call("getUpdates", &GetUpdatesRequest { offset, timeout })
            .await
    }

    /// Send an HTML-formatted message to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        self.call(
            "sendMessage",
            &SendMessageRequest {
                chat_id,
                text,
                parse_mode: "HTML",
            },
        )
        .await
    }
}

/// Check the `ok` flag and extract the result or the API's error description
async fn unwrap_envelope<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    let envelope: ApiResponse<R> = response.json().await?;

    if envelope.ok {
        envelope
            .result
            .ok_or_else(|| TelegramError::api("response marked ok but carried no result"))
    } else {
        let message = envelope
            .description
            .unwrap_or_else(|| format!("HTTP {}", status));
        Err(TelegramError::api(message))
    }
}
