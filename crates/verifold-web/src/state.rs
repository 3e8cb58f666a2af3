//! Shared application state for the web server.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use verifold_db::Database;
use verifold_engine::{Config, PipelineEvent, PipelineHandle};

/// Events pushed to connected clients via SSE. The discovery pipeline is the
/// single producer, so its event type is the wire type.
pub type AppEvent = PipelineEvent;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
    /// Running discovery pipeline, if one was started from the UI.
    pub pipeline: Mutex<Option<PipelineHandle>>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db = Arc::new(Database::open(&config.database.path).await?);
        db.initialize().await?;

        let (event_tx, _) = broadcast::channel(1024);
        Ok(Self {
            db,
            config,
            event_tx,
            pipeline: Mutex::new(None),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }
}

pub type SharedState = Arc<AppState>;
