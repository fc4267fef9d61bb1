//! Upstream Chat-Completion Layer
//!
//! This module defines the conversation message types and the contract for
//! talking to a remote chat-completion API. The `ChatClient` trait is the
//! seam between the message orchestration and the HTTP transport, which
//! keeps the orchestration testable against scripted clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod openrouter;

/// Result type for upstream chat operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur while calling the upstream API.
///
/// An HTTP error status is deliberately NOT represented here: per the
/// upstream contract it is absorbed by the client, which logs the status
/// and body and hands back a fixed user-safe reply instead.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("network failure: {0}")]
    NetworkError(String),

    #[error("request timed out")]
    Timeout,

    #[error("unusable response: {0}")]
    ParseError(String),
}

/// One role-tagged entry of a conversation, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Who produced this entry
    pub role: MessageRole,

    /// Text content
    pub content: String,
}

impl Message {
    /// System-prompt message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Message typed by the human user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Prior reply from the model
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt
    System,

    /// Human user message
    User,

    /// Prior assistant reply
    Assistant,
}

/// Chat-completion client trait
///
/// One request per call, no retries. Implementations absorb HTTP error
/// statuses into a user-safe reply and reserve `Err` for transport-level
/// failures (connection, timeout, malformed body), which the message
/// handler converts into its own fallback reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the name of the upstream provider (e.g., "openrouter")
    fn name(&self) -> &str;

    /// Send the given message sequence and return the reply text
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
