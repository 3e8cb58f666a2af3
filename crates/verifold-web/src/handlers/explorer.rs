//! Discovery explorer — searchable, filterable listing of the ledger.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::str::FromStr;

use crate::handlers::dashboard::page_shell;
use crate::handlers::escape_html;
use crate::state::SharedState;
use verifold_common::validation::QualityTier;
use verifold_db::{Discovery, DiscoveryFilter, DiscoveryRepository};

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Deserialize, Default)]
pub struct ExplorerQuery {
    pub search: Option<String>,
    pub priority: Option<String>,
    pub quality: Option<String>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub page: Option<usize>,
}

impl ExplorerQuery {
    pub fn to_filter(&self) -> DiscoveryFilter {
        DiscoveryFilter {
            search: self.search.clone().filter(|s| !s.is_empty()),
            priority: self.priority.clone().filter(|p| !p.is_empty()),
            quality: self
                .quality
                .as_deref()
                .and_then(|q| QualityTier::from_str(q).ok()),
            min_length: self.min_length,
            max_length: self.max_length,
        }
    }
}

pub async fn explorer_page(
    State(state): State<SharedState>,
    Query(query): Query<ExplorerQuery>,
) -> Html<String> {
    let repo = DiscoveryRepository::new(state.db.clone());
    let filter = query.to_filter();

    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * PAGE_SIZE;

    let total = repo.count_filtered(&filter).await.unwrap_or(0) as usize;
    let discoveries = repo.list(&filter, offset, PAGE_SIZE).await.unwrap_or_default();

    Html(render_explorer(&query, &discoveries, total, page))
}

fn render_explorer(
    query: &ExplorerQuery,
    discoveries: &[Discovery],
    total: usize,
    page: usize,
) -> String {
    let rows: String = if discoveries.is_empty() {
        r#"<tr><td colspan="7" class="text-center text-muted">No records match the current filters.</td></tr>"#.to_string()
    } else {
        discoveries
            .iter()
            .map(|d| {
                format!(
                    r#"<tr>
            <td><a href="/api/discoveries/{id}"><code>{short}</code></a></td>
            <td><code class="sequence">{seq}</code></td>
            <td>{len}</td>
            <td>{score:.3}</td>
            <td>{drug:.3}</td>
            <td>{tier}</td>
            <td><span class="badge badge-{pclass}">{priority}</span></td>
        </tr>"#,
                    id = d.id,
                    short = d.id.to_string().chars().take(8).collect::<String>(),
                    seq = d.sequence.chars().take(32).collect::<String>(),
                    len = d.length,
                    score = d.validation_score,
                    drug = d.druglikeness_score,
                    tier = d.quality_tier(),
                    pclass = d.priority.to_lowercase(),
                    priority = d.priority,
                )
            })
            .collect()
    };

    let last_page = total.div_ceil(PAGE_SIZE).max(1);
    // Query params come straight off the URL; escape before echoing them.
    let base = format!(
        "search={}&priority={}&quality={}",
        escape_html(query.search.as_deref().unwrap_or("")),
        escape_html(query.priority.as_deref().unwrap_or("")),
        escape_html(query.quality.as_deref().unwrap_or("")),
    );
    let pager = format!(
        r#"<div class="pager">
    <a href="/explorer?{base}&page={prev}" class="btn btn-outline {prev_state}">← Prev</a>
    <span class="pager-info">Page {page} of {last_page} ({total} records)</span>
    <a href="/explorer?{base}&page={next}" class="btn btn-outline {next_state}">Next →</a>
</div>"#,
        prev = page.saturating_sub(1).max(1),
        prev_state = if page <= 1 { "disabled" } else { "" },
        next = (page + 1).min(last_page),
        next_state = if page >= last_page { "disabled" } else { "" },
    );

    let selected = |value: &str, current: Option<&str>| {
        if current == Some(value) { " selected" } else { "" }
    };
    let priority = query.priority.as_deref();
    let quality = query.quality.as_deref();

    let body = format!(
        r#"<div class="page-header">
    <h1 class="page-title">Discovery Explorer</h1>
    <p class="text-muted">Search and filter validated discovery records</p>
</div>

<form class="filter-bar" method="get" action="/explorer">
    <input type="text" name="search" placeholder="Sequence or record id…" value="{search}">
    <select name="priority">
        <option value="">Any priority</option>
        <option value="HIGH"{ph}>HIGH</option>
        <option value="MEDIUM"{pm}>MEDIUM</option>
        <option value="LOW"{pl}>LOW</option>
    </select>
    <select name="quality">
        <option value="">Any quality</option>
        <option value="excellent"{qe}>Excellent</option>
        <option value="very_good"{qv}>Very good</option>
        <option value="good"{qg}>Good</option>
        <option value="unranked"{qu}>Unranked</option>
    </select>
    <input type="number" name="min_length" placeholder="Min len" value="{min_len}">
    <input type="number" name="max_length" placeholder="Max len" value="{max_len}">
    <button type="submit" class="btn btn-primary">Filter</button>
</form>

<div class="card">
    <table class="data-table">
        <thead><tr><th>ID</th><th>Sequence</th><th>Length</th><th>Validation</th><th>Druglikeness</th><th>Quality</th><th>Priority</th></tr></thead>
        <tbody>{rows}</tbody>
    </table>
    {pager}
</div>"#,
        search = escape_html(query.search.as_deref().unwrap_or("")),
        ph = selected("HIGH", priority),
        pm = selected("MEDIUM", priority),
        pl = selected("LOW", priority),
        qe = selected("excellent", quality),
        qv = selected("very_good", quality),
        qg = selected("good", quality),
        qu = selected("unranked", quality),
        min_len = query.min_length.map(|v| v.to_string()).unwrap_or_default(),
        max_len = query.max_length.map(|v| v.to_string()).unwrap_or_default(),
        rows = rows,
        pager = pager,
    );

    page_shell("Explorer", "explorer", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_produce_empty_filter() {
        let query = ExplorerQuery {
            search: Some(String::new()),
            priority: Some(String::new()),
            ..Default::default()
        };
        let filter = query.to_filter();
        assert!(filter.predicate().is_none());
    }

    #[test]
    fn test_quality_param_maps_to_tier() {
        let query = ExplorerQuery {
            quality: Some("very_good".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter().quality, Some(QualityTier::VeryGood));
    }

    #[test]
    fn test_search_param_is_escaped_in_rendered_page() {
        let query = ExplorerQuery {
            search: Some(r#""><script>alert(1)</script>"#.to_string()),
            ..Default::default()
        };
        let html = render_explorer(&query, &[], 0, 1);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}
