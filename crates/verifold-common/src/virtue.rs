//! Virtue score vectors attached to discovery records.

use serde::{Deserialize, Serialize};

/// Base virtue projections produced by the residue-state analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VirtueScores {
    pub justice: f64,
    pub honesty: f64,
    pub temperance: f64,
    pub prudence: f64,
}

impl VirtueScores {
    pub fn mean(&self) -> f64 {
        (self.justice + self.honesty + self.temperance + self.prudence) / 4.0
    }

    pub fn clamped(self) -> Self {
        Self {
            justice: self.justice.clamp(0.0, 1.0),
            honesty: self.honesty.clamp(0.0, 1.0),
            temperance: self.temperance.clamp(0.0, 1.0),
            prudence: self.prudence.clamp(0.0, 1.0),
        }
    }
}

/// Genetics-enhanced virtue vector derived from a record's genetics context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneticsVirtues {
    pub fidelity: f64,
    pub robustness: f64,
    pub efficiency: f64,
    pub resilience: f64,
    pub parsimony: f64,
}

impl GeneticsVirtues {
    pub fn clamped(self) -> Self {
        Self {
            fidelity: self.fidelity.clamp(0.0, 1.0),
            robustness: self.robustness.clamp(0.0, 1.0),
            efficiency: self.efficiency.clamp(0.0, 1.0),
            resilience: self.resilience.clamp(0.0, 1.0),
            parsimony: self.parsimony.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        let v = VirtueScores { justice: 0.4, honesty: 0.6, temperance: 0.2, prudence: 0.8 };
        assert!((v.mean() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clamp() {
        let v = VirtueScores { justice: 1.5, honesty: -0.2, temperance: 0.5, prudence: 0.0 };
        let c = v.clamped();
        assert_eq!(c.justice, 1.0);
        assert_eq!(c.honesty, 0.0);
        assert_eq!(c.temperance, 0.5);
    }
}
