//! Bot orchestration and transport
//!
//! `handler` turns one inbound text into one upstream call and one reply;
//! `telegram` moves messages in and out over the Telegram Bot API.

pub mod handler;
pub mod telegram;
