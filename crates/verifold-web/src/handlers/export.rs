//! Export endpoints — CSV and JSON downloads of the ledger.

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;

use crate::handlers::dashboard::page_shell;
use crate::state::SharedState;
use verifold_common::error::ApiError;
use verifold_db::{Discovery, DiscoveryFilter, DiscoveryRepository};

const EXPORT_LIMIT: usize = 10_000;

#[derive(Debug, Deserialize, Default)]
pub struct ExportQuery {
    /// Restrict the export to one priority ("HIGH" for the shortlist).
    pub priority: Option<String>,
}

impl ExportQuery {
    fn to_filter(&self) -> DiscoveryFilter {
        DiscoveryFilter {
            priority: self.priority.clone().filter(|p| !p.is_empty()),
            ..Default::default()
        }
    }
}

pub async fn export_page(State(_state): State<SharedState>) -> Html<String> {
    let body = r#"<div class="page-header">
    <h1 class="page-title">Export</h1>
    <p class="text-muted">Download the discovery ledger for offline analysis</p>
</div>

<div class="card">
    <h2>Downloads</h2>
    <ul class="export-list">
        <li><a href="/api/export/csv" class="btn btn-primary">All records (CSV)</a></li>
        <li><a href="/api/export/json" class="btn btn-primary">All records (JSON)</a></li>
        <li><a href="/api/export/csv?priority=HIGH" class="btn btn-outline">High-priority shortlist (CSV)</a></li>
        <li><a href="/api/export/json?priority=HIGH" class="btn btn-outline">High-priority shortlist (JSON)</a></li>
    </ul>
</div>"#;
    Html(page_shell("Export", "export", body))
}

/// Flatten a record into the CSV row shape.
fn csv_row(d: &Discovery) -> Vec<String> {
    vec![
        d.id.to_string(),
        d.sequence.clone(),
        d.length.to_string(),
        format!("{:.4}", d.validation_score),
        format!("{:.2}", d.energy_kcal_mol),
        format!("{:.4}", d.coherence),
        format!("{:.4}", d.state_fidelity),
        format!("{:.4}", d.druglikeness_score),
        d.druggable.to_string(),
        d.priority.clone(),
        d.quality_tier().to_string(),
        d.discovered_at.to_rfc3339(),
    ]
}

const CSV_HEADER: [&str; 12] = [
    "id",
    "sequence",
    "length",
    "validation_score",
    "energy_kcal_mol",
    "coherence",
    "state_fidelity",
    "druglikeness_score",
    "druggable",
    "priority",
    "quality_tier",
    "discovered_at",
];

fn to_csv(discoveries: &[Discovery]) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    for d in discoveries {
        writer
            .write_record(csv_row(d))
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn api_export_csv(
    State(state): State<SharedState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = DiscoveryRepository::new(state.db.clone());
    let discoveries = repo.list(&query.to_filter(), 0, EXPORT_LIMIT).await?;

    let csv = to_csv(&discoveries)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"verifold_discoveries.csv\"",
            ),
        ],
        csv,
    ))
}

pub async fn api_export_json(
    State(state): State<SharedState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<Vec<Discovery>>, ApiError> {
    let repo = DiscoveryRepository::new(state.db.clone());
    let discoveries = repo.list(&query.to_filter(), 0, EXPORT_LIMIT).await?;
    Ok(Json(discoveries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifold_test_utils::DiscoveryBuilder;

    #[test]
    fn test_csv_has_header_and_rows() {
        let records = vec![
            DiscoveryBuilder::new().build(),
            DiscoveryBuilder::new().priority("HIGH").build(),
        ];
        let bytes = to_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,sequence,length"));
        assert!(lines[2].contains("HIGH"));
    }

    #[test]
    fn test_priority_param_becomes_filter() {
        let query = ExportQuery {
            priority: Some("HIGH".to_string()),
        };
        let predicate = query.to_filter().predicate().unwrap();
        assert_eq!(predicate, "priority = 'HIGH'");
    }
}
