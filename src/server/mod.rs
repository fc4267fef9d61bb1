//! Keep-Alive Health Endpoint
//!
//! Serves `GET /` with a fixed confirmation string so a hosting platform's
//! liveness probe considers the process alive. Not part of the bot
//! protocol; runs as its own supervised task and shares no state with the
//! polling loop.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::errors::BotError;

/// Fixed body returned by the liveness endpoint
pub const HEALTH_REPLY: &str = "Telegram AI relay bot is running.";

/// Bind the health listener on all interfaces at `port`.
///
/// Kept separate from [`serve`] so callers (and tests) can bind an
/// ephemeral port and learn the actual address before serving.
pub async fn bind(port: u16) -> Result<TcpListener, BotError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind health server to {}: {}", addr, e)))
}

/// Serve the health endpoint until the listener fails
pub async fn serve(listener: TcpListener) -> Result<(), BotError> {
    let app = Router::new().route("/", get(health_handler));

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Health server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| BotError::Network(format!("Health server error: {}", e)))
}

async fn health_handler() -> &'static str {
    HEALTH_REPLY
}
