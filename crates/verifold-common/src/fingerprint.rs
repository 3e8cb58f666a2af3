//! Sequence fingerprinting for duplicate tracking.
//!
//! Computes a 64-bit SimHash over overlapping 3-mers so near-identical
//! sequences land close in Hamming space. Stored as i64 in the ledger via
//! a wrapping cast, which is bijective, so the full 64-bit space survives
//! and the fingerprint stays usable as an exact dedup key.

const KMER: usize = 3;

/// Compute the 64-bit fingerprint of a sequence.
pub fn sequence_hash(seq: &str) -> i64 {
    let bytes = seq.as_bytes();
    let mut v: [i64; 64] = [0; 64];

    if bytes.len() < KMER {
        return fnv64(bytes) as i64;
    }

    for window in bytes.windows(KMER) {
        let hash = fnv64(window);
        for i in 0..64usize {
            if (hash >> i) & 1 == 1 {
                v[i] += 1;
            } else {
                v[i] -= 1;
            }
        }
    }

    let mut fingerprint: u64 = 0;
    for i in 0..64usize {
        if v[i] > 0 {
            fingerprint |= 1u64 << i;
        }
    }

    // Wrapping cast: fingerprints with the high bit set come out negative,
    // which is fine for a ledger key and keeps the mapping one-to-one.
    fingerprint as i64
}

/// Hamming distance between two fingerprints.
pub fn hamming_distance(a: i64, b: i64) -> u32 {
    ((a as u64) ^ (b as u64)).count_ones()
}

/// FNV-1a 64-bit hash.
fn fnv64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 14695981039346656037;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sequences_same_hash() {
        let seq = "MKVLAWDEFGSTNQRHYCIL";
        assert_eq!(sequence_hash(seq), sequence_hash(seq));
    }

    #[test]
    fn test_similar_sequences_small_hamming() {
        let a = "MKVLAWDEFGSTNQRHYCILMKVLAWDEFG";
        let b = "MKVLAWDEFGSTNQRHYCILMKVLAWDEFA";
        let dist = hamming_distance(sequence_hash(a), sequence_hash(b));
        assert!(dist <= 16, "Hamming distance was {dist}");
    }

    #[test]
    fn test_different_sequences_large_hamming() {
        let a = "MKVLAWDEFGSTNQRHYCIL";
        let b = "PPPPGGGGSSSSTTTTAAAA";
        let dist = hamming_distance(sequence_hash(a), sequence_hash(b));
        assert!(dist > 10, "Expected large hamming distance, got {dist}");
    }

    #[test]
    fn test_distinct_sequences_keep_distinct_hashes() {
        // Unrelated sequences must not pile up on a shared sentinel value,
        // otherwise duplicate tracking counts them as copies of each other.
        let sequences = [
            "MKVLAWDEFGSTNQRHYCIL",
            "LICYHRQNTSGFEDWALVKM",
            "AAAAKKKKDDDDLLLLWWWW",
            "MKTAYIAKQRQISFVKSHFS",
            "GSGSGSGSGSGSGSGSGSGS",
            "FWYFWYFWYFWYFWYFWYFW",
            "MDEKRHNQSTCYALFWMIVP",
            "PVIMWFLAYCTSQNHRKEDM",
            "RNDCEQGHILKMFPSTWYVA",
            "AVYWTSPFMKLIHGEDCRNQ",
            "MSTNPKPQRKTKRNTNRRPQ",
            "DVSFRLTGADDYLNMELTVS",
        ];
        let mut seen = std::collections::HashSet::new();
        for seq in sequences {
            seen.insert(sequence_hash(seq));
        }
        assert_eq!(seen.len(), sequences.len(), "fingerprint collision across unrelated sequences");
        assert!(!seen.contains(&i64::MAX));
    }

    #[test]
    fn test_high_bit_fingerprints_wrap_negative() {
        // The empty sequence hashes to the FNV-1a offset basis, which has
        // the high bit set. The cast must wrap it negative, not saturate.
        let h = sequence_hash("");
        assert_eq!(h, 14695981039346656037u64 as i64);
        assert!(h < 0);
        assert_ne!(h, i64::MAX);
    }
}
