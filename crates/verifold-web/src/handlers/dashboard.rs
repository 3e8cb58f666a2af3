//! Dashboard handler — main landing page with ledger overview.

use axum::{extract::State, response::Html};

use crate::state::SharedState;
use verifold_db::{Discovery, DiscoveryRepository, LedgerStats};

/// Navigation bar shared across all pages.
pub fn nav_html(active: &str) -> String {
    let link = |href: &str, label: &str, key: &str| {
        let class = if key == active { "nav-link active" } else { "nav-link" };
        format!(r#"<a href="{href}" class="{class}">{label}</a>"#)
    };
    format!(
        r#"<nav class="sidebar">
    <div class="brand">🧬 Verifold</div>
    {}
    {}
    {}
    {}
</nav>"#,
        link("/", "Dashboard", "dashboard"),
        link("/explorer", "Explorer", "explorer"),
        link("/analytics", "Analytics", "analytics"),
        link("/export", "Export", "export"),
    )
}

pub fn page_shell(title: &str, active: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} — Verifold</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
<div class="app-container">
{nav}
<main class="main-content">
{body}
</main>
</div>
</body>
</html>"#,
        title = title,
        nav = nav_html(active),
        body = body,
    )
}

pub async fn dashboard(State(state): State<SharedState>) -> Html<String> {
    let repo = DiscoveryRepository::new(state.db.clone());
    let stats = repo.stats().await.unwrap_or_default();
    let recent = repo.recent(10).await.unwrap_or_default();

    Html(render_dashboard(&stats, &recent))
}

fn render_dashboard(stats: &LedgerStats, recent: &[Discovery]) -> String {
    let quality_bar = |label: &str, count: u64, total: u64, class: &str| {
        let pct = if total > 0 { count * 100 / total } else { 0 };
        format!(
            r#"<div class="quality-row">
        <span class="quality-label">{label}</span>
        <div class="progress-track"><div class="progress-bar {class}" style="width:{pct}%"></div></div>
        <span class="quality-count">{count}</span>
    </div>"#
        )
    };

    let recent_rows: String = if recent.is_empty() {
        r#"<tr><td colspan="5" class="text-center text-muted">No discoveries yet. Start the pipeline to populate the ledger.</td></tr>"#.to_string()
    } else {
        recent
            .iter()
            .map(|d| {
                let preview: String = d.sequence.chars().take(24).collect();
                format!(
                    r#"<tr>
            <td><a href="/api/discoveries/{id}"><code>{short}</code></a></td>
            <td><code class="sequence">{preview}…</code></td>
            <td>{score:.3}</td>
            <td>{energy:.1}</td>
            <td><span class="badge badge-{pclass}">{priority}</span></td>
        </tr>"#,
                    id = d.id,
                    short = d.id.to_string().chars().take(8).collect::<String>(),
                    preview = preview,
                    score = d.validation_score,
                    energy = d.energy_kcal_mol,
                    pclass = d.priority.to_lowercase(),
                    priority = d.priority,
                )
            })
            .collect()
    };

    let body = format!(
        r#"<div class="page-header">
    <h1 class="page-title">Discovery Dashboard</h1>
    <p class="text-muted">Therapeutic protein discovery ledger overview</p>
</div>

<div class="stats-grid">
    <div class="stat-card"><div class="stat-value">{total}</div><div class="stat-label">Total Discoveries</div></div>
    <div class="stat-card"><div class="stat-value">{druggable}</div><div class="stat-label">Druggable</div></div>
    <div class="stat-card"><div class="stat-value">{high}</div><div class="stat-label">High Priority</div></div>
    <div class="stat-card"><div class="stat-value">{avg_drug:.3}</div><div class="stat-label">Avg Druglikeness</div></div>
    <div class="stat-card"><div class="stat-value">{unique}</div><div class="stat-label">Unique Sequences</div></div>
    <div class="stat-card"><div class="stat-value">{dup:.1}%</div><div class="stat-label">Duplicate Rate</div></div>
</div>

<div class="card">
    <h2>Quality Distribution</h2>
    {excellent}
    {very_good}
    {good}
    {unranked}
</div>

<div class="card">
    <h2>Recent Discoveries</h2>
    <table class="data-table">
        <thead><tr><th>ID</th><th>Sequence</th><th>Validation</th><th>Energy (kcal/mol)</th><th>Priority</th></tr></thead>
        <tbody>{recent_rows}</tbody>
    </table>
</div>"#,
        total = stats.total,
        druggable = stats.druggable,
        high = stats.high_priority,
        avg_drug = stats.avg_druglikeness,
        unique = stats.unique_sequences,
        dup = stats.duplicate_rate,
        excellent = quality_bar("Excellent (≥0.9)", stats.quality.excellent, stats.total, "success"),
        very_good = quality_bar("Very good (≥0.8)", stats.quality.very_good, stats.total, "info"),
        good = quality_bar("Good (≥0.7)", stats.quality.good, stats.total, "warning"),
        unranked = quality_bar("Unranked (<0.7)", stats.quality.unranked, stats.total, "muted"),
        recent_rows = recent_rows,
    );

    page_shell("Dashboard", "dashboard", &body)
}
