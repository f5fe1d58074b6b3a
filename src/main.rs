//! Task bot - team task tracking over Telegram
//!
//! A chat bot implementing a conversation state machine for multi-step
//! task commands, persisted in SQLite.

mod db;
mod keyboard;
mod router;
mod state_machine;
mod telegram;

use db::Database;
use router::Router;
use state_machine::StateStore;
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pause before retrying after a failed poll
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskbot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let Ok(token) = std::env::var("BOT_TOKEN") else {
        tracing::error!(
            "BOT_TOKEN is not set. Get a token from @BotFather and export BOT_TOKEN."
        );
        std::process::exit(1);
    };

    let db_path =
        std::env::var("TASKBOT_DB_PATH").unwrap_or_else(|_| "tasks.db".to_string());

    // Initialize database (creates the table and applies migrations)
    tracing::info!(path = %db_path, "Opening database");
    let db = Database::open(&db_path)?;

    let client = Arc::new(TelegramClient::new(&token));
    let router = Router::new(db, StateStore::new(), client.clone(), client.clone());

    tracing::info!("Bot started, polling for updates");

    let mut offset = 0i64;
    loop {
        match client.get_updates(offset).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    router.handle_update(update).await;
                }
            }
            Err(e) => {
                // Transient polling failures must not take the bot down
                tracing::warn!(error = %e, "getUpdates failed, retrying");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}
