//! Candidate validation rules and quality tiers.
//!
//! A candidate passes validation when its length is in [15, 100]; the
//! validation score starts at 0.3 and earns increments for each composition
//! class falling in the accepted window. Only validated candidates are ever
//! written to the ledger.

use serde::{Deserialize, Serialize};

use crate::residues::{is_valid_sequence, CompositionProfile};

pub const MIN_LENGTH: usize = 15;
pub const MAX_LENGTH: usize = 100;

/// Result of validating a single candidate sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub score: f64,
    pub assessment: String,
}

/// Score a candidate sequence against the composition rules.
pub fn validate_sequence(seq: &str) -> ValidationOutcome {
    if !is_valid_sequence(seq) {
        return ValidationOutcome {
            passed: false,
            score: 0.0,
            assessment: "REJECTED: non-canonical residues".to_string(),
        };
    }

    let profile = CompositionProfile::of(seq);
    if profile.length < MIN_LENGTH || profile.length > MAX_LENGTH {
        return ValidationOutcome {
            passed: false,
            score: 0.0,
            assessment: format!(
                "REJECTED: length {} outside [{}, {}]",
                profile.length, MIN_LENGTH, MAX_LENGTH
            ),
        };
    }

    let mut score = 0.3;
    if (0.05..=0.9).contains(&profile.hydrophobic_fraction()) {
        score += 0.25;
    }
    if (0.02..=0.6).contains(&profile.charged_fraction()) {
        score += 0.25;
    }
    if (0.02..=0.6).contains(&profile.polar_fraction()) {
        score += 0.2;
    }

    ValidationOutcome {
        passed: true,
        score,
        assessment: "VALID: composition-rule validation passed".to_string(),
    }
}

/// Quality tier derived from the validation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    VeryGood,
    Good,
    Unranked,
}

impl QualityTier {
    pub fn from_score(validation_score: f64) -> Self {
        if validation_score >= 0.9 {
            QualityTier::Excellent
        } else if validation_score >= 0.8 {
            QualityTier::VeryGood
        } else if validation_score >= 0.7 {
            QualityTier::Good
        } else {
            QualityTier::Unranked
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excellent" => Ok(QualityTier::Excellent),
            "very_good" => Ok(QualityTier::VeryGood),
            "good" => Ok(QualityTier::Good),
            "unranked" => Ok(QualityTier::Unranked),
            _ => Err(format!("Unknown quality tier: {}", s)),
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityTier::Excellent => write!(f, "excellent"),
            QualityTier::VeryGood => write!(f, "very_good"),
            QualityTier::Good => write!(f, "good"),
            QualityTier::Unranked => write!(f, "unranked"),
        }
    }
}

/// Therapeutic priority derived from the druglikeness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_druglikeness(druglikeness: f64) -> Self {
        if druglikeness > 0.7 {
            Priority::High
        } else if druglikeness > 0.5 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_rejected() {
        let out = validate_sequence("MKVLA");
        assert!(!out.passed);
        assert_eq!(out.score, 0.0);
    }

    #[test]
    fn test_balanced_sequence_full_score() {
        // 20 residues, all three class windows satisfied
        let out = validate_sequence("MKVLADEFGSTNQRHWYCIL");
        assert!(out.passed);
        assert!((out.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_homopolymer_base_score_only() {
        // All-glycine: no class window satisfied, score stays at base
        let seq = "G".repeat(30);
        let out = validate_sequence(&seq);
        assert!(out.passed);
        assert!((out.score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_quality_tier_boundaries() {
        assert_eq!(QualityTier::from_score(0.95), QualityTier::Excellent);
        assert_eq!(QualityTier::from_score(0.9), QualityTier::Excellent);
        assert_eq!(QualityTier::from_score(0.85), QualityTier::VeryGood);
        assert_eq!(QualityTier::from_score(0.75), QualityTier::Good);
        assert_eq!(QualityTier::from_score(0.5), QualityTier::Unranked);
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::from_druglikeness(0.8), Priority::High);
        assert_eq!(Priority::from_druglikeness(0.6), Priority::Medium);
        assert_eq!(Priority::from_druglikeness(0.3), Priority::Low);
    }
}
