//! Genetics context generation.
//!
//! Each stored discovery carries a sampled genetics annotation: plausible
//! variants, regulatory elements, epigenetic and proteostasis factors, and
//! candidate interventions. The genetics virtue scores are derived
//! deterministically from the sampled context and the base virtue means.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use verifold_common::residues::CompositionProfile;
use verifold_common::virtue::{GeneticsVirtues, VirtueScores};

const TRANSCRIPTION_FACTORS: &[&str] = &[
    "TP53", "MYC", "JUN", "FOS", "STAT3", "NF-kB", "AP1", "E2F1", "SP1", "CREB",
];

const MICRO_RNAS: &[&str] = &[
    "miR-21", "miR-155", "miR-34a", "miR-125b", "miR-146a", "miR-200c", "miR-let-7",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticVariant {
    pub rsid: String,
    pub kind: String,
    pub effect: String,
    /// Coding variants carry a folding impact; regulatory ones an expression impact.
    pub impact: f64,
    pub allele_frequency: f64,
    pub chromosome: String,
    pub position: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryElement {
    pub kind: String,
    pub name: String,
    pub strength: f64,
    pub regulation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpigeneticContext {
    pub promoter_methylation: f64,
    pub gene_body_methylation: f64,
    pub chromatin_accessibility: f64,
    pub in_active_compartment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteostasisFactors {
    pub chaperone_availability: f64,
    pub degradation_capacity: f64,
    pub folding_stress: f64,
    pub capacity_utilization: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    pub kind: String,
    pub name: String,
    pub efficacy: f64,
}

/// Full genetics annotation attached to a discovery record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticsContext {
    pub variants: Vec<GeneticVariant>,
    pub regulatory_elements: Vec<RegulatoryElement>,
    pub epigenetics: EpigeneticContext,
    pub proteostasis: ProteostasisFactors,
    pub interventions: Vec<Intervention>,
    pub virtues: GeneticsVirtues,
}

/// Sample a genetics context for a validated sequence.
pub fn generate_context(
    sequence: &str,
    base_virtues: &VirtueScores,
    rng: &mut StdRng,
) -> GeneticsContext {
    let variants = sample_variants(rng);
    let regulatory_elements = sample_regulatory_elements(sequence, rng);
    let epigenetics = EpigeneticContext {
        promoter_methylation: rng.gen_range(0.0..0.7),
        gene_body_methylation: rng.gen_range(0.2..0.6),
        chromatin_accessibility: rng.gen_range(0.2..1.0),
        in_active_compartment: rng.gen_bool(0.6),
    };
    let proteostasis = ProteostasisFactors {
        chaperone_availability: rng.gen_range(0.3..1.2),
        degradation_capacity: rng.gen_range(0.5..1.2),
        folding_stress: rng.gen_range(0.0..0.6),
        capacity_utilization: rng.gen_range(0.3..0.9),
    };
    let interventions = sample_interventions(rng);

    let virtues = genetics_virtues(
        base_virtues,
        &variants,
        &proteostasis,
        regulatory_elements.len(),
    );

    GeneticsContext {
        variants,
        regulatory_elements,
        epigenetics,
        proteostasis,
        interventions,
        virtues,
    }
}

fn random_allele(rng: &mut StdRng) -> char {
    *['A', 'T', 'G', 'C'].choose(rng).unwrap_or(&'A')
}

fn sample_variants(rng: &mut StdRng) -> Vec<GeneticVariant> {
    let mut variants = Vec::new();

    // Coding variant 40% of the time.
    if rng.gen_bool(0.4) {
        let effect = *["missense", "nonsense", "frameshift", "splice_site"]
            .choose(rng)
            .unwrap_or(&"missense");
        variants.push(GeneticVariant {
            rsid: format!("rs{}", rng.gen_range(1_000_000u64..99_999_999)),
            kind: "coding".to_string(),
            effect: format!(
                "{} {}>{}",
                effect,
                random_allele(rng),
                random_allele(rng)
            ),
            impact: rng.gen_range(0.1..0.9),
            allele_frequency: rng.gen_range(0.001..0.3),
            chromosome: rng.gen_range(1u8..23).to_string(),
            position: rng.gen_range(1_000_000u64..250_000_000),
        });
    }

    // Regulatory variant 60% of the time.
    if rng.gen_bool(0.6) {
        let effect = *["promoter_variant", "enhancer_variant", "silencer_variant"]
            .choose(rng)
            .unwrap_or(&"promoter_variant");
        variants.push(GeneticVariant {
            rsid: format!("rs{}", rng.gen_range(1_000_000u64..99_999_999)),
            kind: "regulatory".to_string(),
            effect: effect.to_string(),
            impact: rng.gen_range(0.5..2.0),
            allele_frequency: rng.gen_range(0.01..0.4),
            chromosome: rng.gen_range(1u8..23).to_string(),
            position: rng.gen_range(1_000_000u64..250_000_000),
        });
    }

    variants
}

fn sample_regulatory_elements(sequence: &str, rng: &mut StdRng) -> Vec<RegulatoryElement> {
    let mut elements = Vec::new();

    // 1-3 transcription factors; binding tracks the charged fraction.
    let charged_fraction = CompositionProfile::of(sequence).charged_fraction();
    let base_affinity = 0.3 + charged_fraction * 0.4;

    let num_tfs = rng.gen_range(1..4);
    let mut tf_pool: Vec<&str> = TRANSCRIPTION_FACTORS.to_vec();
    tf_pool.shuffle(rng);
    for tf in tf_pool.into_iter().take(num_tfs) {
        elements.push(RegulatoryElement {
            kind: "transcription_factor".to_string(),
            name: tf.to_string(),
            strength: (base_affinity + rng.gen_range(-0.15..0.15)).clamp(0.1, 0.95),
            regulation: if rng.gen_bool(0.7) {
                "activator".to_string()
            } else {
                "repressor".to_string()
            },
        });
    }

    // 0-2 miRNAs.
    let num_mirnas = rng.gen_range(0..3);
    let mut mirna_pool: Vec<&str> = MICRO_RNAS.to_vec();
    mirna_pool.shuffle(rng);
    for mirna in mirna_pool.into_iter().take(num_mirnas) {
        elements.push(RegulatoryElement {
            kind: "miRNA".to_string(),
            name: mirna.to_string(),
            strength: rng.gen_range(0.2..0.8),
            regulation: "repressor".to_string(),
        });
    }

    elements
}

fn sample_interventions(rng: &mut StdRng) -> Vec<Intervention> {
    let mut interventions = Vec::new();

    if rng.gen_bool(0.5) {
        interventions.push(Intervention {
            kind: "chaperone_inducer".to_string(),
            name: (*["HSP70 Activator", "HSP90 Inducer", "BiP Enhancer"]
                .choose(rng)
                .unwrap_or(&"HSP70 Activator"))
            .to_string(),
            efficacy: rng.gen_range(0.4..0.9),
        });
    }
    if rng.gen_bool(0.6) {
        interventions.push(Intervention {
            kind: "membrane_stabilizer".to_string(),
            name: (*["Choline Supplement", "Phosphatidylserine", "Omega-3 Complex"]
                .choose(rng)
                .unwrap_or(&"Choline Supplement"))
            .to_string(),
            efficacy: rng.gen_range(0.3..0.8),
        });
    }
    if rng.gen_bool(0.7) {
        interventions.push(Intervention {
            kind: "stress_reducer".to_string(),
            name: (*["Antioxidant Complex", "NAD+ Precursor", "Glutathione Booster"]
                .choose(rng)
                .unwrap_or(&"Antioxidant Complex"))
            .to_string(),
            efficacy: rng.gen_range(0.5..0.85),
        });
    }

    interventions
}

/// Derive genetics virtue scores from the sampled context. Deterministic in
/// its inputs; every output is clamped to [0, 1].
pub fn genetics_virtues(
    base: &VirtueScores,
    variants: &[GeneticVariant],
    proteostasis: &ProteostasisFactors,
    num_regulators: usize,
) -> GeneticsVirtues {
    // Coding variants erode fidelity in proportion to their folding impact.
    let mut variant_impact = 1.0;
    for variant in variants {
        if variant.kind == "coding" {
            variant_impact *= 1.0 - variant.impact * 0.2;
        }
    }
    let fidelity = base.justice * variant_impact;

    let robustness = base.temperance * (1.0 - proteostasis.folding_stress * 0.3);

    let efficiency = (base.prudence * (2.0 - proteostasis.capacity_utilization) * 0.7
        + proteostasis.chaperone_availability * 0.3)
        .min(1.0);

    let resilience = base.honesty * 0.6 + proteostasis.degradation_capacity * 0.4;

    // Fewer regulators is simpler.
    let parsimony = 1.0 / (1.0 + num_regulators as f64 / 5.0);

    GeneticsVirtues {
        fidelity,
        robustness,
        efficiency,
        resilience,
        parsimony,
    }
    .clamped()
}
