//! Therapeutic scoring and record assembly.
//!
//! Combines validation, analysis and composition signals into a
//! druglikeness score, decides priority, and builds the ledger record.

use crate::analysis::SequenceAnalysis;
use crate::genetics::GeneticsContext;
use verifold_common::residues::CompositionProfile;
use verifold_common::validation::{Priority, ValidationOutcome};
use verifold_common::Result;
use verifold_db::Discovery;

/// Hydrophobic fraction at which the membrane-balance component peaks.
const HYDROPHOBIC_OPTIMUM: f64 = 0.4;

/// Composite druglikeness in [0, 1].
///
/// Weighted blend of validation score, state fidelity from the analysis,
/// conformational score, and how close the hydrophobic fraction sits to the
/// membrane-balance optimum.
pub fn druglikeness(
    outcome: &ValidationOutcome,
    analysis: &SequenceAnalysis,
    profile: &CompositionProfile,
) -> f64 {
    let balance =
        (1.0 - (profile.hydrophobic_fraction() - HYDROPHOBIC_OPTIMUM).abs() / HYDROPHOBIC_OPTIMUM)
            .clamp(0.0, 1.0);

    let score = outcome.score * 0.35
        + analysis.state_fidelity * 0.25
        + analysis.vqbit_score * 0.2
        + balance * 0.2;

    score.clamp(0.0, 1.0)
}

/// Build a full ledger record from the engine outputs for one sequence.
pub fn build_discovery(
    sequence: String,
    outcome: &ValidationOutcome,
    analysis: &SequenceAnalysis,
    genetics: &GeneticsContext,
) -> Result<Discovery> {
    let profile = CompositionProfile::of(&sequence);
    let druglikeness = druglikeness(outcome, analysis, &profile);
    let priority = Priority::from_druglikeness(druglikeness);

    let mut discovery = Discovery::new(sequence, outcome.score);
    discovery.energy_kcal_mol = analysis.energy_kcal_mol;
    discovery.coherence = analysis.coherence;
    discovery.state_fidelity = analysis.state_fidelity;
    discovery.vqbit_score = analysis.vqbit_score;
    discovery.virtues = analysis.virtues.clamped();
    discovery.genetics_virtues = genetics.virtues;
    discovery.druglikeness_score = druglikeness;
    discovery.druggable = druglikeness > 0.5;
    discovery.priority = priority.as_str().to_string();
    discovery.charged_residues = profile.charged_count as i64;
    discovery.hydrophobic_fraction = profile.hydrophobic_fraction();
    discovery.genetics_context = Some(serde_json::to_string(genetics)?);
    discovery.assessment = outcome.assessment.clone();

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sample_residue_states;
    use crate::genetics::generate_context;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use verifold_common::validation::validate_sequence;

    const SEQ: &str = "MKVLAWFHDERTGYNQCSPIAKLVWMDE";

    #[test]
    fn test_druglikeness_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = validate_sequence(SEQ);
        let states = sample_residue_states(SEQ, &mut rng);
        let analysis = crate::analysis::summarize(&states, &mut rng);
        let profile = CompositionProfile::of(SEQ);

        let score = druglikeness(&outcome, &analysis, &profile);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_build_discovery_populates_record() {
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = validate_sequence(SEQ);
        let states = sample_residue_states(SEQ, &mut rng);
        let analysis = crate::analysis::summarize(&states, &mut rng);
        let genetics = generate_context(SEQ, &analysis.virtues.clamped(), &mut rng);

        let discovery = build_discovery(SEQ.to_string(), &outcome, &analysis, &genetics).unwrap();

        assert_eq!(discovery.sequence, SEQ);
        assert_eq!(discovery.length as usize, SEQ.len());
        assert_eq!(discovery.druggable, discovery.druglikeness_score > 0.5);
        assert!(discovery.genetics_context.is_some());
        assert!(["HIGH", "MEDIUM", "LOW"].contains(&discovery.priority.as_str()));
        assert!(discovery.charged_residues > 0);
    }
}
