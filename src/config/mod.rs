//! Configuration management
//!
//! All configuration comes from the environment, read once at startup.
//! Two variables are required and their absence is fatal before any
//! network or platform call happens:
//!
//! - **TELEGRAM_BOT_TOKEN**: bot token for the Telegram API
//! - **OPENROUTER_API_KEY**: API key for the upstream completions API
//!
//! Everything else has a default: `PORT` (8080), `OPENROUTER_MODEL`,
//! `SYSTEM_PROMPT`, `USERS_FILE`, `LOG_LEVEL`, `HISTORY_WINDOW`,
//! `MAX_CONVERSATIONS`.

use std::path::PathBuf;

use crate::bot::handler::DEFAULT_SYSTEM_PROMPT;
use crate::errors::BotError;
use crate::memory::{DEFAULT_MAX_CONVERSATIONS, DEFAULT_WINDOW};

/// Runtime configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub telegram_token: String,

    /// OpenRouter API key
    pub openrouter_api_key: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// System prompt prepended to every request context
    pub system_prompt: String,

    /// Health server port
    pub port: u16,

    /// Path of the known-users file
    pub users_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Messages kept per user conversation
    pub history_window: usize,

    /// Tracked conversations before least-recently-active eviction
    pub max_conversations: usize,
}

fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_users_file() -> PathBuf {
    PathBuf::from("users.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Assemble the configuration from the process environment
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Assemble the configuration from an arbitrary variable source.
    ///
    /// Exists so tests can exercise validation without touching the
    /// process environment.
    pub fn from_vars<F>(get: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token = require(&get, "TELEGRAM_BOT_TOKEN")?;
        let openrouter_api_key = require(&get, "OPENROUTER_API_KEY")?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                BotError::Config(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => default_port(),
        };

        let history_window = parse_bound(&get, "HISTORY_WINDOW", DEFAULT_WINDOW)?;
        let max_conversations = parse_bound(&get, "MAX_CONVERSATIONS", DEFAULT_MAX_CONVERSATIONS)?;

        let log_level = get("LOG_LEVEL").unwrap_or_else(default_log_level);
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&log_level.as_str()) {
            return Err(BotError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                log_level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(Self {
            telegram_token,
            openrouter_api_key,
            model: get("OPENROUTER_MODEL").unwrap_or_else(default_model),
            system_prompt: get("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            port,
            users_file: get("USERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_users_file),
            log_level,
            history_window,
            max_conversations,
        })
    }
}

fn require<F>(get: &F, name: &str) -> Result<String, BotError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BotError::Config(format!(
            "{} environment variable is missing",
            name
        ))),
    }
}

fn parse_bound<F>(get: &F, name: &str, default: usize) -> Result<usize, BotError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => {
            let value = raw.parse::<usize>().map_err(|_| {
                BotError::Config(format!("{} must be a positive integer, got '{}'", name, raw))
            })?;
            if value == 0 {
                return Err(BotError::Config(format!("{} must be at least 1", name)));
            }
            Ok(value)
        }
        None => Ok(default),
    }
}
