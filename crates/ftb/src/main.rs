use std::sync::Arc;

use ftb_core::{
    config::Config,
    store::{BotStore, MemoryStore},
};
use ftb_sqlite::SqliteStore;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), ftb_core::Error> {
    ftb_core::logging::init("ftb")?;

    let cfg = Arc::new(Config::load()?);

    let store: Arc<dyn BotStore> = if cfg.uses_memory_store() {
        warn!("using in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        info!(database_url = %cfg.database_url, "opening sqlite store");
        Arc::new(SqliteStore::connect(&cfg.database_url).await?)
    };

    ftb_telegram::router::run(cfg, store)
        .await
        .map_err(|e| ftb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
