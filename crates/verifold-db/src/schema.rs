//! Schema definitions for the ledger table.
//!
//! LanceDB uses Apache Arrow for storage, so the Arrow schema lives in
//! `schema_arrow`; this module defines the Rust-side record struct.

use verifold_common::validation::{Priority, QualityTier};
use verifold_common::virtue::{GeneticsVirtues, VirtueScores};

pub const TABLE_DISCOVERIES: &str = "discoveries";

/// A validated discovery record as stored in the ledger.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Discovery {
    pub id: uuid::Uuid,
    pub sequence: String,
    pub sequence_hash: i64,
    pub length: i64,
    pub energy_kcal_mol: f64,
    pub validation_score: f64,
    pub coherence: f64,
    pub state_fidelity: f64,
    pub vqbit_score: f64,
    pub virtues: VirtueScores,
    pub genetics_virtues: GeneticsVirtues,
    pub druglikeness_score: f64,
    pub druggable: bool,
    pub priority: String,
    pub charged_residues: i64,
    pub hydrophobic_fraction: f64,
    /// Free-form genetics annotations (variants, regulatory elements,
    /// epigenetics, proteostasis, interventions) serialized as JSON.
    pub genetics_context: Option<String>,
    pub assessment: String,
    pub discovered_at: chrono::DateTime<chrono::Utc>,
}

impl Discovery {
    pub fn new(sequence: String, validation_score: f64) -> Self {
        let hash = verifold_common::fingerprint::sequence_hash(&sequence);
        let length = sequence.chars().count() as i64;
        Self {
            id: uuid::Uuid::new_v4(),
            sequence,
            sequence_hash: hash,
            length,
            energy_kcal_mol: 0.0,
            validation_score,
            coherence: 0.0,
            state_fidelity: 0.0,
            vqbit_score: 0.0,
            virtues: VirtueScores::default(),
            genetics_virtues: GeneticsVirtues::default(),
            druglikeness_score: 0.0,
            druggable: false,
            priority: Priority::Low.as_str().to_string(),
            charged_residues: 0,
            hydrophobic_fraction: 0.0,
            genetics_context: None,
            assessment: String::new(),
            discovered_at: chrono::Utc::now(),
        }
    }

    pub fn quality_tier(&self) -> QualityTier {
        QualityTier::from_score(self.validation_score)
    }
}
