//! Telegram Bot Integration
//!
//! Provides a long-polling interface to the Telegram Bot API. Each update
//! is dispatched as an independent task; messages from one user that race
//! each other may interleave in conversation memory, which is an accepted
//! limitation of the transport.

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::bot::handler::ChatHandler;

/// Production Telegram API base URL
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Long-poll timeout passed to getUpdates, in seconds
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed getUpdates call
const FETCH_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram caps messages at 4096 chars; clip below that with a marker
const REPLY_CLIP_LEN: usize = 4000;

/// Acknowledgment sent before the upstream call
const THINKING_REPLY: &str = "Thinking...";

#[derive(Deserialize, Debug)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Deserialize, Debug)]
struct Message {
    chat: Chat,
    text: Option<String>,
    from: Option<User>,
}

#[derive(Deserialize, Debug)]
struct Chat {
    id: i64,
}

#[derive(Deserialize, Debug)]
struct User {
    id: i64,
}

#[derive(Deserialize, Debug)]
struct GetUpdatesResponse {
    ok: bool,
    result: Option<Vec<Update>>,
}

#[derive(Clone)]
pub struct TelegramBot {
    token: String,
    api_base: String,
    client: Client,
    handler: Arc<ChatHandler>,
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TelegramBot {
    pub fn new(token: String, handler: Arc<ChatHandler>) -> Self {
        Self {
            token,
            api_base: TELEGRAM_API_BASE.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            handler,
        }
    }

    /// Point the bot at a different API base (used by tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Start the long-polling loop
    ///
    /// This blocks the current task. Should be spawned in a background
    /// tokio task.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Polling Telegram for updates");
        let mut offset = 0;

        loop {
            match self.get_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = update.update_id + 1;
                        if let Some(msg) = update.message {
                            let bot = self.clone();
                            tokio::spawn(async move {
                                bot.handle_message(&msg).await;
                            });
                        }
                    }
                }
                Err(e) => {
                    error!("getUpdates failed: {}; retrying shortly", e);
                    tokio::time::sleep(FETCH_RETRY_DELAY).await;
                }
            }
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let url = format!(
            "{}/bot{}/getUpdates?offset={}&timeout={}",
            self.api_base, self.token, offset, POLL_TIMEOUT_SECS
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .json::<GetUpdatesResponse>()
            .await?;

        if !response.ok {
            return Err(anyhow::anyhow!("getUpdates answered with ok=false"));
        }

        Ok(response.result.unwrap_or_default())
    }

    async fn handle_message(&self, msg: &Message) {
        let chat_id = msg.chat.id;

        let user_id = match msg.from.as_ref() {
            Some(u) => u.id,
            None => {
                warn!("Dropping a message that carries no sender");
                return;
            }
        };

        if let Some(text) = &msg.text {
            info!("Received message from {}", user_id);

            if text.starts_with('/') {
                self.handle_command(chat_id, user_id, text).await;
                return;
            }

            let _ = self.send_message(chat_id, THINKING_REPLY).await;

            let reply = self.handler.respond(user_id, text).await;
            if let Err(e) = self.send_message(chat_id, &clip_reply(&reply)).await {
                error!("Failed to send reply to {}: {}", chat_id, e);
            }
        }
    }

    /// Handle built-in bot commands
    async fn handle_command(&self, chat_id: i64, user_id: i64, cmd: &str) {
        let reply = match cmd.split_whitespace().next().unwrap_or("") {
            "/start" => self.handler.greet(user_id).await,
            "/stats" => self.handler.stats().await,
            _ => format!("Unknown command: {}", cmd),
        };

        if let Err(e) = self.send_message(chat_id, &reply).await {
            error!("Could not deliver command reply to {}: {}", chat_id, e);
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);

        #[derive(Serialize)]
        struct SendMsgReq<'a> {
            chat_id: i64,
            text: &'a str,
        }

        let req = SendMsgReq { chat_id, text };

        self.client.post(&url).json(&req).send().await?;
        Ok(())
    }
}

/// Clip a reply that would exceed Telegram's message length limit
fn clip_reply(reply: &str) -> String {
    if reply.len() > REPLY_CLIP_LEN {
        let cut = reply
            .char_indices()
            .take_while(|(i, _)| *i < REPLY_CLIP_LEN)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...\n\n(truncated)", &reply[..cut])
    } else {
        reply.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::openrouter::OpenRouterClient;
    use crate::memory::ConversationMemory;
    use crate::users::UserRegistry;

    fn test_handler() -> Arc<ChatHandler> {
        let dir = tempfile::tempdir().unwrap();
        let users = Arc::new(UserRegistry::load(dir.path().join("users.json")).unwrap());
        let client = Arc::new(OpenRouterClient::new("key", "model"));
        Arc::new(ChatHandler::new(
            client,
            Arc::new(ConversationMemory::new()),
            users,
            "test prompt",
        ))
    }

    #[test]
    fn test_bot_creation() {
        let bot = TelegramBot::new("test_token".to_string(), test_handler());
        assert_eq!(bot.token, "test_token");
        assert_eq!(bot.api_base, TELEGRAM_API_BASE);
    }

    #[test]
    fn test_with_api_base() {
        let bot =
            TelegramBot::new("t".to_string(), test_handler()).with_api_base("http://localhost:1");
        assert_eq!(bot.api_base, "http://localhost:1");
    }

    #[test]
    fn test_clip_reply_short_text_untouched() {
        assert_eq!(clip_reply("hello"), "hello");
    }

    #[test]
    fn test_clip_reply_long_text_truncated() {
        let long = "x".repeat(5000);
        let clipped = clip_reply(&long);
        assert!(clipped.len() < long.len());
        assert!(clipped.ends_with("(truncated)"));
    }

    #[test]
    fn test_clip_reply_respects_char_boundaries() {
        let long = "é".repeat(3000);
        let clipped = clip_reply(&long);
        assert!(clipped.ends_with("(truncated)"));
    }

    #[test]
    fn test_update_deserialization() {
        let json = r#"{
            "ok": true,
            "result": [{
                "update_id": 10,
                "message": {
                    "chat": {"id": 5},
                    "text": "hello",
                    "from": {"id": 99}
                }
            }]
        }"#;
        let parsed: GetUpdatesResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.ok);
        let updates = parsed.result.unwrap();
        assert_eq!(updates[0].update_id, 10);
        let msg = updates[0].message.as_ref().unwrap();
        assert_eq!(msg.chat.id, 5);
        assert_eq!(msg.text.as_deref(), Some("hello"));
        assert_eq!(msg.from.as_ref().unwrap().id, 99);
    }
}
