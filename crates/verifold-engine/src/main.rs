//! Verifold discovery launcher.
//!
//! Run with: cargo run -p verifold-engine --bin verifold-discover

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verifold_db::Database;
use verifold_engine::{Config, PipelineHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load_or_default();
    info!(path = %config.database.path, "opening discovery ledger");

    let db = Arc::new(Database::open(&config.database.path).await?);
    db.initialize().await?;

    let (event_tx, _) = broadcast::channel(1024);
    let handle = PipelineHandle::spawn(config, db, event_tx);

    info!("discovery running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");

    let metrics = handle.stop().await;
    info!(
        cycles = metrics.cycles_completed,
        discoveries = metrics.valid_discoveries,
        "discovery finished"
    );

    Ok(())
}
