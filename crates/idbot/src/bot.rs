//! Long-polling message loop

use chrono::Utc;
use idbot_core::constants;
use idbot_storage::{UserRecord, UserStore};
use idbot_telegram::{Message, Result, TelegramClient, User};
use std::time::Duration;
use tracing::{info, warn};

/// Delay before retrying after a failed getUpdates call
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// The bot's request/response loop over getUpdates
pub struct Bot {
    client: TelegramClient,
    store: UserStore,
    poll_timeout: u32,
}

impl Bot {
    pub fn new(client: TelegramClient, store: UserStore) -> Self {
        Self {
            client,
            store,
            poll_timeout: constants::DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Poll for updates until the surrounding task is cancelled.
    ///
    /// Only the initial identity check can fail; a bot that cannot even
    /// authenticate has nothing to poll for. Everything after that is
    /// logged and retried.
    pub async fn run(mut self) -> Result<()> {
        let me = self.client.get_me().await?;
        info!(
            "bot is running as @{}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );
        info!("bot is listening for messages...");

        let mut offset = 0i64;
        loop {
            let updates = match self.client.get_updates(offset, self.poll_timeout).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("failed to fetch updates: {}", e);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Some(message) = update.message {
                    self.handle_message(message).await;
                }
            }
        }
    }

    async fn handle_message(&mut self, message: Message) {
        let from = match &message.from {
            Some(from) => from.clone(),
            None => return,
        };

        self.store.register(user_record(&from));
        if let Err(e) = self.store.save() {
            warn!("failed to save user registry: {}", e);
        }

        let response = format_response(&message, from.id);
        if let Err(e) = self.client.send_message(message.chat.id, &response).await {
            warn!("failed to send message to {}: {}", message.chat.id, e);
        }
    }
}

fn user_record(user: &User) -> UserRecord {
    UserRecord {
        user_id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        first_seen: Utc::now().timestamp(),
    }
}

/// Build the HTML reply: the sender's ID, the chat ID, and the forward
/// origin when the message was forwarded.
fn format_response(message: &Message, user_id: i64) -> String {
    let mut response = format!(
        "<b>Your user ID:</b> <code>{}</code>\n<b>Current chat ID:</b> <code>{}</code>",
        user_id, message.chat.id
    );

    if let Some(name) = message
        .forward_sender_name
        .as_deref()
        .filter(|n| !n.is_empty())
    {
        response.push_str(&format!("\n<b>Forwarded from:</b> [hidden name] {}", name));
    } else if let Some(user) = &message.forward_from {
        response.push_str(&format!("\n<b>Forwarded from:</b> <code>{}</code>", user.id));
    } else if let Some(chat) = &message.forward_from_chat {
        response.push_str(&format!(
            "\n<b>Forwarded from chat:</b> <code>{}</code>",
            chat.id
        ));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use idbot_telegram::Chat;

    fn plain_message(user_id: i64, chat_id: i64) -> Message {
        Message {
            message_id: 1,
            from: Some(User {
                id: user_id,
                first_name: "Alice".to_string(),
                last_name: None,
                username: Some("alice".to_string()),
            }),
            chat: Chat { id: chat_id },
            text: Some("hi".to_string()),
            forward_from: None,
            forward_from_chat: None,
            forward_sender_name: None,
        }
    }

    #[test]
    fn test_response_carries_user_and_chat_ids() {
        let response = format_response(&plain_message(42, -100123), 42);
        assert_eq!(
            response,
            "<b>Your user ID:</b> <code>42</code>\n<b>Current chat ID:</b> <code>-100123</code>"
        );
    }

    #[test]
    fn test_response_for_hidden_name_forward() {
        let mut message = plain_message(42, 5);
        message.forward_sender_name = Some("Bob".to_string());
        // A visible forward_from must not override the hidden-name line.
        message.forward_from = Some(User {
            id: 99,
            first_name: "Bob".to_string(),
            last_name: None,
            username: None,
        });

        let response = format_response(&message, 42);
        assert!(response.contains("<b>Forwarded from:</b> [hidden name] Bob"));
        assert!(!response.contains("<code>99</code>"));
    }

    #[test]
    fn test_response_for_user_forward() {
        let mut message = plain_message(42, 5);
        message.forward_from = Some(User {
            id: 99,
            first_name: "Bob".to_string(),
            last_name: None,
            username: None,
        });

        let response = format_response(&message, 42);
        assert!(response.contains("<b>Forwarded from:</b> <code>99</code>"));
    }

    #[test]
    fn test_response_for_channel_forward() {
        let mut message = plain_message(42, 5);
        message.forward_from_chat = Some(Chat { id: -100777 });

        let response = format_response(&message, 42);
        assert!(response.contains("<b>Forwarded from chat:</b> <code>-100777</code>"));
    }

    #[test]
    fn test_user_record_captures_identity() {
        let user = User {
            id: 7,
            first_name: "Alice".to_string(),
            last_name: Some("Smith".to_string()),
            username: Some("alice".to_string()),
        };

        let record = user_record(&user);
        assert_eq!(record.user_id, 7);
        assert_eq!(record.first_name, "Alice");
        assert_eq!(record.last_name.as_deref(), Some("Smith"));
        assert_eq!(record.username.as_deref(), Some("alice"));
        assert!(record.first_seen > 0);
    }
}
