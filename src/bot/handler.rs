//! Message Orchestration
//!
//! One pass per inbound text message: register the sender, append the text
//! to their conversation, send system prompt + window upstream, relay the
//! reply, append it. Exactly one upstream call per message, no retries.
//!
//! An HTTP error status never reaches this layer as a fault (the client
//! absorbs it into its own fallback reply, which is appended like any
//! other assistant turn). A transport fault does, and degrades to a
//! distinct fixed reply with nothing appended for the failed turn.

use std::sync::Arc;

use crate::llm::{ChatClient, Message};
use crate::memory::ConversationMemory;
use crate::users::UserRegistry;

/// Reply sent when the upstream call fails at the transport level
pub const ERROR_REPLY: &str = "Something went wrong. Please try again later.";

/// Reply to the /start command
pub const GREETING: &str =
    "Hey! I'm your AI assistant.\n\nSend me any question and I'll remember our chat.";

/// Default system prompt prepended to every request context
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly Telegram assistant.";

/// Per-message orchestration over memory, registry, and upstream client
pub struct ChatHandler {
    client: Arc<dyn ChatClient>,
    memory: Arc<ConversationMemory>,
    users: Arc<UserRegistry>,
    system_prompt: String,
}

impl ChatHandler {
    pub fn new(
        client: Arc<dyn ChatClient>,
        memory: Arc<ConversationMemory>,
        users: Arc<UserRegistry>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            memory,
            users,
            system_prompt: system_prompt.into(),
        }
    }

    /// Handle one inbound text message and return the reply to relay.
    ///
    /// Never fails: every failure path degrades to a short fixed reply.
    pub async fn respond(&self, user_id: i64, text: &str) -> String {
        self.users.register(user_id).await;

        self.memory.append(user_id, Message::user(text));

        let window = self.memory.window(user_id);
        let mut context = Vec::with_capacity(window.len() + 1);
        context.push(Message::system(&self.system_prompt));
        context.extend(window);

        match self.client.complete(&context).await {
            Ok(reply) => {
                self.memory.append(user_id, Message::assistant(reply.clone()));
                reply
            }
            Err(e) => {
                tracing::error!(
                    "{} completion failed for user {}: {}",
                    self.client.name(),
                    user_id,
                    e
                );
                ERROR_REPLY.to_string()
            }
        }
    }

    /// Handle the /start command: register the sender and greet them
    pub async fn greet(&self, user_id: i64) -> String {
        self.users.register(user_id).await;
        GREETING.to_string()
    }

    /// Handle the /stats command
    pub async fn stats(&self) -> String {
        format!(
            "Total users who interacted with me: {}",
            self.users.count().await
        )
    }
}
