//! JSON API for the discovery ledger.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::explorer::{ExplorerQuery, PAGE_SIZE};
use crate::state::SharedState;
use verifold_common::error::ApiError;
use verifold_db::{Discovery, DiscoveryRepository, LedgerStats};

#[derive(Debug, Serialize)]
pub struct DiscoveryPage {
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
    pub records: Vec<Discovery>,
}

/// `GET /api/discoveries` — filtered, paginated listing.
pub async fn api_discoveries(
    State(state): State<SharedState>,
    Query(query): Query<ExplorerQuery>,
) -> Result<Json<DiscoveryPage>, ApiError> {
    let repo = DiscoveryRepository::new(state.db.clone());
    let filter = query.to_filter();

    let page = query.page.unwrap_or(1).max(1);
    let total = repo.count_filtered(&filter).await?;
    let records = repo.list(&filter, (page - 1) * PAGE_SIZE, PAGE_SIZE).await?;

    Ok(Json(DiscoveryPage {
        total,
        page,
        page_size: PAGE_SIZE,
        records,
    }))
}

/// `GET /api/discoveries/{id}` — one full record.
pub async fn api_discovery_detail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Discovery>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("invalid record id: {id}")))?;

    let repo = DiscoveryRepository::new(state.db.clone());
    let discovery = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("discovery {id}")))?;

    Ok(Json(discovery))
}

/// `GET /api/stats` — aggregate ledger statistics.
pub async fn api_stats(State(state): State<SharedState>) -> Result<Json<LedgerStats>, ApiError> {
    let repo = DiscoveryRepository::new(state.db.clone());
    Ok(Json(repo.stats().await?))
}
