//! Amino-acid alphabet and sequence composition statistics.

/// The 20 canonical amino-acid one-letter codes.
pub const CANONICAL: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Residue classes used by the validation rules.
pub const HYDROPHOBIC: &str = "ALFWMIV";
pub const CHARGED: &str = "DEHKR";
pub const POLAR: &str = "NQSTCY";
pub const AROMATIC: &str = "FWY";

pub fn is_canonical(aa: char) -> bool {
    CANONICAL.contains(aa)
}

/// Check that a sequence contains only canonical residue letters.
pub fn is_valid_sequence(seq: &str) -> bool {
    !seq.is_empty() && seq.chars().all(is_canonical)
}

/// Per-class composition fractions of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionProfile {
    pub length: usize,
    pub hydrophobic_count: usize,
    pub charged_count: usize,
    pub polar_count: usize,
    pub aromatic_count: usize,
    pub cysteine_count: usize,
    pub proline_count: usize,
}

impl CompositionProfile {
    pub fn of(seq: &str) -> Self {
        let mut p = Self {
            length: seq.chars().count(),
            hydrophobic_count: 0,
            charged_count: 0,
            polar_count: 0,
            aromatic_count: 0,
            cysteine_count: 0,
            proline_count: 0,
        };
        for aa in seq.chars() {
            if HYDROPHOBIC.contains(aa) {
                p.hydrophobic_count += 1;
            }
            if CHARGED.contains(aa) {
                p.charged_count += 1;
            }
            if POLAR.contains(aa) {
                p.polar_count += 1;
            }
            if AROMATIC.contains(aa) {
                p.aromatic_count += 1;
            }
            if aa == 'C' {
                p.cysteine_count += 1;
            }
            if aa == 'P' {
                p.proline_count += 1;
            }
        }
        p
    }

    pub fn hydrophobic_fraction(&self) -> f64 {
        self.fraction(self.hydrophobic_count)
    }

    pub fn charged_fraction(&self) -> f64 {
        self.fraction(self.charged_count)
    }

    pub fn polar_fraction(&self) -> f64 {
        self.fraction(self.polar_count)
    }

    /// Amino-acid diversity: distinct residues over the 20-letter alphabet.
    pub fn diversity(seq: &str) -> f64 {
        if seq.is_empty() {
            return 0.0;
        }
        let mut seen = [false; 26];
        for aa in seq.chars() {
            if aa.is_ascii_uppercase() {
                seen[(aa as u8 - b'A') as usize] = true;
            }
        }
        seen.iter().filter(|&&s| s).count() as f64 / 20.0
    }

    fn fraction(&self, count: usize) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            count as f64 / self.length as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_alphabet_size() {
        assert_eq!(CANONICAL.len(), 20);
    }

    #[test]
    fn test_valid_sequence() {
        assert!(is_valid_sequence("MKVLAWDE"));
        assert!(!is_valid_sequence("MKXLB"));
        assert!(!is_valid_sequence(""));
    }

    #[test]
    fn test_composition_fractions() {
        // A L F are hydrophobic, D K charged, S N polar
        let p = CompositionProfile::of("ALFDKSN");
        assert_eq!(p.length, 7);
        assert_eq!(p.hydrophobic_count, 3);
        assert_eq!(p.charged_count, 2);
        assert_eq!(p.polar_count, 2);
        assert!((p.hydrophobic_fraction() - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_diversity() {
        assert!((CompositionProfile::diversity("AAAA") - 0.05).abs() < 1e-12);
        assert!((CompositionProfile::diversity(CANONICAL) - 1.0).abs() < 1e-12);
    }
}
