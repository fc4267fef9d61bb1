// Parrot Telegram AI relay bot
// Main entry point for the parrot binary

use std::sync::Arc;

use clap::Parser;
use parrot::bot::handler::ChatHandler;
use parrot::bot::telegram::TelegramBot;
use parrot::cli::Cli;
use parrot::config::Config;
use parrot::llm::openrouter::OpenRouterClient;
use parrot::memory::ConversationMemory;
use parrot::server;
use parrot::telemetry;
use parrot::users::UserRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Fail fast on configuration before any network call happens
    let mut config = Config::from_env()?;
    if let Some(log) = cli.log {
        config.log_level = log;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(users_file) = cli.users_file {
        config.users_file = users_file;
    }

    telemetry::init(&config.log_level);
    tracing::info!("Parrot v{}", env!("CARGO_PKG_VERSION"));

    let users = Arc::new(UserRegistry::load(&config.users_file)?);
    tracing::info!(
        "Loaded {} known users from {:?}",
        users.count().await,
        users.path()
    );

    let memory = Arc::new(ConversationMemory::with_limits(
        config.history_window,
        config.max_conversations,
    ));
    let client = Arc::new(OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.model.clone(),
    ));
    let handler = Arc::new(ChatHandler::new(
        client,
        memory,
        users,
        config.system_prompt.clone(),
    ));

    let bot = TelegramBot::new(config.telegram_token.clone(), handler);

    // Health server and polling loop run as independently supervised
    // tasks with no shared mutable state; either one exiting is fatal.
    let listener = server::bind(config.port).await?;
    let mut health = tokio::spawn(server::serve(listener));
    let mut polling = tokio::spawn(async move { bot.start_polling().await });

    tracing::info!("Telegram bot is running.");

    tokio::select! {
        res = &mut health => {
            polling.abort();
            match res {
                Ok(Ok(())) => anyhow::bail!("health server exited unexpectedly"),
                Ok(Err(e)) => anyhow::bail!("health server failed: {}", e),
                Err(e) => anyhow::bail!("health server task panicked: {}", e),
            }
        }
        res = &mut polling => {
            health.abort();
            match res {
                Ok(Ok(())) => anyhow::bail!("polling loop exited unexpectedly"),
                Ok(Err(e)) => anyhow::bail!("polling loop failed: {}", e),
                Err(e) => anyhow::bail!("polling loop task panicked: {}", e),
            }
        }
    }
}
