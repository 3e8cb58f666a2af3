//! Axum router — maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::handlers::{
    analytics::analytics_page,
    api::{api_discoveries, api_discovery_detail, api_stats},
    dashboard::dashboard,
    explorer::explorer_page,
    export::{api_export_csv, api_export_json, export_page},
    pipeline::{pipeline_start, pipeline_stop},
};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/", get(dashboard))
        .route("/explorer", get(explorer_page))
        .route("/analytics", get(analytics_page))
        .route("/export", get(export_page))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/discoveries", get(api_discoveries))
        .route("/api/discoveries/{id}", get(api_discovery_detail))
        .route("/api/stats", get(api_stats))
        .route("/api/export/csv", get(api_export_csv))
        .route("/api/export/json", get(api_export_json))
        .route("/api/discover/run", post(pipeline_start))
        .route("/api/discover/stop", post(pipeline_stop))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
