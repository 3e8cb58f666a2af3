//! Shared testing utilities for the Verifold workspace.
//!
//! Deterministic sequence and record builders so tests across crates agree
//! on fixture shapes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verifold_common::residues::CANONICAL;
use verifold_db::Discovery;

/// A known-good sequence that passes composition validation.
pub const WELL_FORMED_SEQUENCE: &str = "MKVLAWFHDERTGYNQCSPIAKLVWMDE";

/// Generate a random canonical sequence of the given length, seeded for
/// reproducibility.
pub fn random_sequence(len: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let alphabet: Vec<char> = CANONICAL.chars().collect();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

/// Builder for discovery records with sensible defaults per field.
pub struct DiscoveryBuilder {
    sequence: String,
    validation_score: f64,
    energy_kcal_mol: f64,
    coherence: f64,
    druglikeness_score: f64,
    priority: String,
}

impl Default for DiscoveryBuilder {
    fn default() -> Self {
        Self {
            sequence: WELL_FORMED_SEQUENCE.to_string(),
            validation_score: 0.8,
            energy_kcal_mol: -295.0,
            coherence: 0.85,
            druglikeness_score: 0.6,
            priority: "MEDIUM".to_string(),
        }
    }
}

impl DiscoveryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }

    pub fn validation_score(mut self, score: f64) -> Self {
        self.validation_score = score;
        self
    }

    pub fn energy(mut self, kcal_mol: f64) -> Self {
        self.energy_kcal_mol = kcal_mol;
        self
    }

    pub fn coherence(mut self, coherence: f64) -> Self {
        self.coherence = coherence;
        self
    }

    pub fn druglikeness(mut self, score: f64) -> Self {
        self.druglikeness_score = score;
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn build(self) -> Discovery {
        let mut discovery = Discovery::new(self.sequence, self.validation_score);
        discovery.energy_kcal_mol = self.energy_kcal_mol;
        discovery.coherence = self.coherence;
        discovery.druglikeness_score = self.druglikeness_score;
        discovery.druggable = self.druglikeness_score > 0.5;
        discovery.priority = self.priority;
        discovery
    }
}
