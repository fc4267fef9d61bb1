//! Error types and handling
//!
//! This module provides the error types used across the bot. Upstream
//! chat-completion errors have their own taxonomy in [`crate::llm`];
//! everything else funnels through [`BotError`].
//!
//! Error messages are safe to log but are never relayed verbatim into a
//! chat: every user-visible failure path degrades to a short fixed reply.

use thiserror::Error;

/// Main bot error type
///
/// # Error Categories
///
/// - **Configuration**: missing or invalid environment variables
/// - **Network**: binding or serving the health endpoint
/// - **Persistence**: reading or writing the known-users file
#[derive(Debug, Error)]
pub enum BotError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // User-registry persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
