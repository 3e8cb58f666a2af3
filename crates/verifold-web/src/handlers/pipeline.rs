//! Pipeline control — start and stop discovery from the UI.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::{AppEvent, SharedState};
use verifold_common::error::ApiError;
use verifold_engine::PipelineHandle;

/// `POST /api/discover/run` — spawn the discovery loop if not running.
pub async fn pipeline_start(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let mut guard = state.pipeline.lock().await;
    if guard.is_some() {
        return Ok(Json(json!({ "status": "already_running" })));
    }

    let handle = PipelineHandle::spawn(
        state.config.clone(),
        state.db.clone(),
        state.event_tx.clone(),
    );
    *guard = Some(handle);

    let _ = state.event_tx.send(AppEvent::Notification {
        message: "discovery pipeline started".to_string(),
    });
    Ok(Json(json!({ "status": "started" })))
}

/// `POST /api/discover/stop` — request shutdown and report final counters.
pub async fn pipeline_stop(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let handle = state.pipeline.lock().await.take();
    let Some(handle) = handle else {
        return Ok(Json(json!({ "status": "not_running" })));
    };

    let metrics = handle.stop().await;
    let _ = state.event_tx.send(AppEvent::Notification {
        message: format!(
            "discovery stopped after {} cycles, {} discoveries",
            metrics.cycles_completed, metrics.valid_discoveries
        ),
    });

    Ok(Json(json!({
        "status": "stopped",
        "metrics": metrics,
    })))
}
