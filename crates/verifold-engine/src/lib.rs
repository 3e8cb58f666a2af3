//! Continuous discovery engine.
//!
//! Generates candidate protein sequences, runs a stochastic per-residue
//! conformational analysis over each batch, validates candidates against
//! composition rules, and stores only the validated records in the ledger.

pub mod analysis;
pub mod config;
pub mod generator;
pub mod genetics;
pub mod pipeline;
pub mod scoring;

pub use analysis::{analyze_batch, ResidueState, SequenceAnalysis};
pub use config::Config;
pub use generator::SequenceGenerator;
pub use pipeline::{run_discovery, DiscoveryMetrics, PipelineEvent, PipelineHandle};
