//! Discovery ledger repository.
//!
//! Provides insert and query operations for validated discovery records.

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::schema::{Discovery, TABLE_DISCOVERIES};
use crate::schema_arrow::{discoveries_to_record, record_to_discovery};
use arrow_array::{Float64Array, Int64Array};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use std::collections::HashSet;
use std::sync::Arc;
use verifold_common::validation::QualityTier;

/// Filter parameters for ledger listings (mirrors the explorer UI).
#[derive(Debug, Clone, Default)]
pub struct DiscoveryFilter {
    /// Substring match against sequence or record id.
    pub search: Option<String>,
    /// Exact priority match ("HIGH" / "MEDIUM" / "LOW").
    pub priority: Option<String>,
    /// Quality tier over validation_score.
    pub quality: Option<QualityTier>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
}

impl DiscoveryFilter {
    /// Build the SQL predicate for LanceDB's `only_if`.
    /// Returns None when no filter is active.
    pub fn predicate(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if let Some(ref term) = self.search {
            let escaped = term.replace('\'', "''");
            clauses.push(format!(
                "(sequence LIKE '%{}%' OR id LIKE '%{}%')",
                escaped.to_uppercase(),
                escaped
            ));
        }

        if let Some(ref priority) = self.priority {
            let escaped = priority.replace('\'', "''");
            clauses.push(format!("priority = '{}'", escaped.to_uppercase()));
        }

        if let Some(quality) = self.quality {
            let clause = match quality {
                QualityTier::Excellent => "validation_score >= 0.9".to_string(),
                QualityTier::VeryGood => {
                    "(validation_score >= 0.8 AND validation_score < 0.9)".to_string()
                }
                QualityTier::Good => {
                    "(validation_score >= 0.7 AND validation_score < 0.8)".to_string()
                }
                QualityTier::Unranked => "validation_score < 0.7".to_string(),
            };
            clauses.push(clause);
        }

        if let Some(min) = self.min_length {
            clauses.push(format!("length >= {}", min));
        }
        if let Some(max) = self.max_length {
            clauses.push(format!("length <= {}", max));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }
}

/// Quality-tier counts over the whole ledger.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct QualityDistribution {
    pub excellent: u64,
    pub very_good: u64,
    pub good: u64,
    pub unranked: u64,
}

/// Aggregate ledger statistics for dashboards and shutdown reports.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct LedgerStats {
    pub total: u64,
    pub unique_sequences: u64,
    /// Percentage of records whose sequence fingerprint repeats.
    pub duplicate_rate: f64,
    pub quality: QualityDistribution,
    pub druggable: u64,
    pub high_priority: u64,
    pub avg_druglikeness: f64,
    pub avg_coherence: f64,
}

/// Repository for discovery ledger operations.
#[derive(Clone)]
pub struct DiscoveryRepository {
    db: Arc<Database>,
}

impl DiscoveryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a single record.
    pub async fn insert(&self, discovery: &Discovery) -> Result<()> {
        self.insert_batch(std::slice::from_ref(discovery)).await
    }

    /// Insert multiple records in bulk.
    pub async fn insert_batch(&self, discoveries: &[Discovery]) -> Result<()> {
        if discoveries.is_empty() {
            return Ok(());
        }

        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;

        let record = discoveries_to_record(discoveries)?;
        let schema = record.schema();
        let iter = arrow_array::RecordBatchIterator::new(vec![Ok(record)], schema);

        table.add(iter).execute().await?;
        Ok(())
    }

    /// Find a record by ID.
    pub async fn find_by_id(&self, id: uuid::Uuid) -> Result<Option<Discovery>> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;

        let mut stream = table
            .query()
            .only_if(format!("id = '{}'", id))
            .execute()
            .await?;

        if let Some(batch) = stream.next().await {
            let batch = batch?;
            if batch.num_rows() > 0 {
                return Ok(Some(record_to_discovery(&batch, 0)?));
            }
        }

        Ok(None)
    }

    /// Check whether a sequence fingerprint is already present.
    pub async fn exists_by_sequence_hash(&self, hash: i64) -> Result<bool> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;
        let count = table
            .count_rows(Some(format!("sequence_hash = {}", hash)))
            .await?;
        Ok(count > 0)
    }

    /// List records matching a filter with pagination.
    pub async fn list(
        &self,
        filter: &DiscoveryFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Discovery>> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;

        let mut query = table.query().limit(limit).offset(offset);
        if let Some(predicate) = filter.predicate() {
            query = query.only_if(predicate);
        }

        let mut stream = query.execute().await?;
        let mut discoveries = Vec::new();
        while let Some(batch) = stream.next().await {
            let batch = batch?;
            for i in 0..batch.num_rows() {
                discoveries.push(record_to_discovery(&batch, i)?);
            }
        }

        Ok(discoveries)
    }

    /// Count total records.
    pub async fn count(&self) -> Result<u64> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;
        Ok(table.count_rows(None).await? as u64)
    }

    /// Count records matching a filter.
    pub async fn count_filtered(&self, filter: &DiscoveryFilter) -> Result<u64> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;
        Ok(table.count_rows(filter.predicate()).await? as u64)
    }

    /// Compute aggregate ledger statistics.
    ///
    /// Tier and priority counts use pushed-down filters; the unique-sequence
    /// and mean computations scan the fingerprint and score columns.
    pub async fn stats(&self) -> Result<LedgerStats> {
        let table = self
            .db
            .connection()
            .open_table(TABLE_DISCOVERIES)
            .execute()
            .await?;

        let total = table.count_rows(None).await? as u64;

        let quality = QualityDistribution {
            excellent: table
                .count_rows(Some("validation_score >= 0.9".to_string()))
                .await? as u64,
            very_good: table
                .count_rows(Some(
                    "validation_score >= 0.8 AND validation_score < 0.9".to_string(),
                ))
                .await? as u64,
            good: table
                .count_rows(Some(
                    "validation_score >= 0.7 AND validation_score < 0.8".to_string(),
                ))
                .await? as u64,
            unranked: table
                .count_rows(Some("validation_score < 0.7".to_string()))
                .await? as u64,
        };

        let druggable = table.count_rows(Some("druggable = true".to_string())).await? as u64;
        let high_priority = table
            .count_rows(Some("priority = 'HIGH'".to_string()))
            .await? as u64;

        // Scan for fingerprint uniqueness and score means.
        let mut hashes: HashSet<i64> = HashSet::new();
        let mut druglikeness_sum = 0.0f64;
        let mut coherence_sum = 0.0f64;
        let mut scanned = 0u64;

        let mut stream = table.query().execute().await?;
        while let Some(batch) = stream.next().await {
            let batch = batch?;
            let hash_col = batch
                .column_by_name("sequence_hash")
                .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
                .ok_or_else(|| DbError::Arrow("sequence_hash column missing".to_string()))?;
            let drug_col = batch
                .column_by_name("druglikeness_score")
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| DbError::Arrow("druglikeness_score column missing".to_string()))?;
            let coh_col = batch
                .column_by_name("coherence")
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| DbError::Arrow("coherence column missing".to_string()))?;

            for i in 0..batch.num_rows() {
                hashes.insert(hash_col.value(i));
                druglikeness_sum += drug_col.value(i);
                coherence_sum += coh_col.value(i);
                scanned += 1;
            }
        }

        let unique_sequences = hashes.len() as u64;
        let duplicate_rate = if total > 0 {
            (total - unique_sequences) as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let (avg_druglikeness, avg_coherence) = if scanned > 0 {
            (
                druglikeness_sum / scanned as f64,
                coherence_sum / scanned as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Ok(LedgerStats {
            total,
            unique_sequences,
            duplicate_rate,
            quality,
            druggable,
            high_priority,
            avg_druglikeness,
            avg_coherence,
        })
    }

    /// Recently stored records, newest first.
    ///
    /// LanceDB has no ORDER BY pushdown in this query path, so this pulls a
    /// window from the tail of the table and sorts it in memory. The window
    /// position assumes row offsets track insertion order, which holds for
    /// an append-only ledger but not after a compaction that reorders rows;
    /// in that case the result is approximate, never wrong by more than the
    /// window.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Discovery>> {
        let total = self.count().await? as usize;
        let offset = total.saturating_sub(limit.max(1) * 4);
        let mut window = self.list(&DiscoveryFilter::default(), offset, limit * 4).await?;
        window.sort_by(|a, b| b.discovered_at.cmp(&a.discovered_at));
        window.truncate(limit);
        Ok(window)
    }

    /// Top records by druglikeness.
    ///
    /// Ranks within a bounded scan: the first 1000 HIGH-priority rows, or
    /// the first 1000 overall when those are too few. A record outside the
    /// scanned rows can be missed, so treat the result as a leaderboard
    /// sample rather than an exact global top-N.
    pub async fn top_by_druglikeness(&self, limit: usize) -> Result<Vec<Discovery>> {
        let filter = DiscoveryFilter {
            priority: Some("HIGH".to_string()),
            ..Default::default()
        };
        let mut rows = self.list(&filter, 0, 1000).await?;
        if rows.len() < limit {
            rows = self.list(&DiscoveryFilter::default(), 0, 1000).await?;
        }
        rows.sort_by(|a, b| {
            b.druglikeness_score
                .partial_cmp(&a.druglikeness_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows.truncate(limit);
        Ok(rows)
    }
}
