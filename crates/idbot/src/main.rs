//! idbot - Telegram bot that replies with user and chat IDs

use anyhow::{Context, Result};
use idbot_core::BotConfig;
use idbot_logs::RotationConfig;
use idbot_storage::UserStore;
use idbot_telegram::TelegramClient;
use tracing::{error, info, warn};

mod bot;

use bot::Bot;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up first so every later failure lands in the log file.
    let logger = idbot_logs::initialize(RotationConfig::default())
        .context("failed to set up logging")?;

    if let Err(e) = dotenvy::dotenv() {
        warn!(".env file not found, using environment variables: {}", e);
    }
    let config = BotConfig::from_env()?;

    let store = UserStore::load_default();
    info!("loaded {} users from storage", store.len());

    let client = TelegramClient::new(config.token);
    let bot = Bot::new(client, store);

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        result = bot.run() => {
            if let Err(e) = result {
                error!("bot error: {}", e);
                logger.shutdown().await;
                return Err(e.into());
            }
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down...");
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down...");
        }
    }

    info!("shutdown complete");
    logger.shutdown().await;
    Ok(())
}
