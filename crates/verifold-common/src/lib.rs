//! verifold-common — Shared types, errors, and scoring primitives used across all Verifold crates.

pub mod error;
pub mod fingerprint;
pub mod residues;
pub mod validation;
pub mod virtue;

// Re-export commonly used types
pub use error::{Result, VerifoldError};
pub use residues::CompositionProfile;
pub use validation::{Priority, QualityTier, ValidationOutcome};
pub use virtue::{GeneticsVirtues, VirtueScores};
