mod api;
mod config;
mod error;
mod interpreters;
mod normalize;
mod server;
mod state;
mod traits;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::interpreters::RuleBasedInterpreter;
use crate::state::sqlite::SqliteStateStore;
use crate::traits::{DreamInterpreter, PersonStore, TagStore};

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = PathBuf::from("config.toml");
    let config = config::AppConfig::load(&config_path)?;

    // Run async
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: config::AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(SqliteStateStore::new(&config.state.db_path).await?);

    let persons: Arc<dyn PersonStore> = store.clone();
    let tags: Arc<dyn TagStore> = store.clone();
    let interpreter: Arc<dyn DreamInterpreter> = Arc::new(RuleBasedInterpreter::new(persons, tags));

    server::serve(&config.server, store, interpreter).await
}
