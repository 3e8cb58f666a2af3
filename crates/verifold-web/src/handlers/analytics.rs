//! Analytics page — property summaries and top performers.

use axum::{extract::State, response::Html};

use crate::handlers::dashboard::page_shell;
use crate::state::SharedState;
use verifold_db::{Discovery, DiscoveryFilter, DiscoveryRepository, LedgerStats};

pub async fn analytics_page(State(state): State<SharedState>) -> Html<String> {
    let repo = DiscoveryRepository::new(state.db.clone());
    let stats = repo.stats().await.unwrap_or_default();
    let top = repo.top_by_druglikeness(10).await.unwrap_or_default();
    let sample = repo
        .list(&DiscoveryFilter::default(), 0, 1000)
        .await
        .unwrap_or_default();

    Html(render_analytics(&stats, &top, &sample))
}

struct PropertySummary {
    avg_length: f64,
    avg_energy: f64,
    avg_fidelity: f64,
    avg_hydrophobic: f64,
}

fn summarize(sample: &[Discovery]) -> PropertySummary {
    if sample.is_empty() {
        return PropertySummary {
            avg_length: 0.0,
            avg_energy: 0.0,
            avg_fidelity: 0.0,
            avg_hydrophobic: 0.0,
        };
    }
    let n = sample.len() as f64;
    PropertySummary {
        avg_length: sample.iter().map(|d| d.length as f64).sum::<f64>() / n,
        avg_energy: sample.iter().map(|d| d.energy_kcal_mol).sum::<f64>() / n,
        avg_fidelity: sample.iter().map(|d| d.state_fidelity).sum::<f64>() / n,
        avg_hydrophobic: sample.iter().map(|d| d.hydrophobic_fraction).sum::<f64>() / n,
    }
}

fn render_analytics(stats: &LedgerStats, top: &[Discovery], sample: &[Discovery]) -> String {
    let props = summarize(sample);

    let top_rows: String = if top.is_empty() {
        r#"<tr><td colspan="6" class="text-center text-muted">No discoveries recorded yet.</td></tr>"#.to_string()
    } else {
        top.iter()
            .enumerate()
            .map(|(i, d)| {
                format!(
                    r#"<tr>
            <td><span class="rank-badge">#{rank}</span></td>
            <td><a href="/api/discoveries/{id}"><code>{short}</code></a></td>
            <td>{drug:.3}</td>
            <td>{score:.3}</td>
            <td>{coherence:.3}</td>
            <td><span class="badge badge-{pclass}">{priority}</span></td>
        </tr>"#,
                    rank = i + 1,
                    id = d.id,
                    short = d.id.to_string().chars().take(8).collect::<String>(),
                    drug = d.druglikeness_score,
                    score = d.validation_score,
                    coherence = d.coherence,
                    pclass = d.priority.to_lowercase(),
                    priority = d.priority,
                )
            })
            .collect()
    };

    let body = format!(
        r#"<div class="page-header">
    <h1 class="page-title">Analytics</h1>
    <p class="text-muted">Aggregate properties across the discovery ledger</p>
</div>

<div class="stats-grid">
    <div class="stat-card"><div class="stat-value">{avg_len:.1}</div><div class="stat-label">Avg Length</div></div>
    <div class="stat-card"><div class="stat-value">{avg_energy:.1}</div><div class="stat-label">Avg Energy (kcal/mol)</div></div>
    <div class="stat-card"><div class="stat-value">{avg_fid:.3}</div><div class="stat-label">Avg State Fidelity</div></div>
    <div class="stat-card"><div class="stat-value">{avg_hydro:.3}</div><div class="stat-label">Avg Hydrophobic Fraction</div></div>
    <div class="stat-card"><div class="stat-value">{avg_coh:.3}</div><div class="stat-label">Avg Coherence</div></div>
    <div class="stat-card"><div class="stat-value">{avg_drug:.3}</div><div class="stat-label">Avg Druglikeness</div></div>
</div>

<div class="card">
    <h2>Top Performers</h2>
    <table class="data-table">
        <thead><tr><th>Rank</th><th>ID</th><th>Druglikeness</th><th>Validation</th><th>Coherence</th><th>Priority</th></tr></thead>
        <tbody>{top_rows}</tbody>
    </table>
</div>"#,
        avg_len = props.avg_length,
        avg_energy = props.avg_energy,
        avg_fid = props.avg_fidelity,
        avg_hydro = props.avg_hydrophobic,
        avg_coh = stats.avg_coherence,
        avg_drug = stats.avg_druglikeness,
        top_rows = top_rows,
    );

    page_shell("Analytics", "analytics", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifold_test_utils::DiscoveryBuilder;

    #[test]
    fn test_property_summary_means() {
        let a = DiscoveryBuilder::new().energy(-300.0).build();
        let b = DiscoveryBuilder::new().energy(-200.0).build();
        let summary = summarize(&[a, b]);
        assert!((summary.avg_energy + 250.0).abs() < 1e-9);
        assert!(summary.avg_length > 0.0);
    }

    #[test]
    fn test_empty_sample_is_zeroed() {
        let summary = summarize(&[]);
        assert_eq!(summary.avg_energy, 0.0);
    }
}
