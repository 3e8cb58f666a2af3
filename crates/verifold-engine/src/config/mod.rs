//! Configuration loading for Verifold.
//! Reads verifold.toml from the current directory or path in VERIFOLD_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub scaling: ScalingConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Directory for the file fallback store used when the ledger is down.
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: String,
}

fn default_db_path()      -> String { "./data/verifold.lance".to_string() }
fn default_fallback_dir() -> String { "./data/fallback_discoveries".to_string() }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            fallback_dir: default_fallback_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sequences generated per discovery cycle.
    #[serde(default = "default_sequences_per_cycle")]
    pub sequences_per_cycle: usize,
    /// Analysis batch size within a cycle.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Stop after this many cycles; None runs until shutdown.
    pub max_cycles: Option<u64>,
    /// Seed for the sequence generator; None derives one from entropy.
    pub seed: Option<u64>,
    /// Emit a progress report every N cycles.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_sequences_per_cycle() -> usize { 256 }
fn default_batch_size()          -> usize { 32 }
fn default_progress_interval()   -> u64   { 5 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sequences_per_cycle: default_sequences_per_cycle(),
            batch_size: default_batch_size(),
            max_cycles: None,
            seed: None,
            progress_interval: default_progress_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    #[serde(default = "bool_true")]
    pub auto_scale: bool,
    /// Systems with at least this much RAM use the aggressive scaling path.
    #[serde(default = "default_high_memory_gb")]
    pub high_memory_gb: u64,
}

fn bool_true()              -> bool { true }
fn default_high_memory_gb() -> u64  { 100 }

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            auto_scale: bool_true(),
            high_memory_gb: default_high_memory_gb(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String { "127.0.0.1:8501".to_string() }

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

mod tests;

impl Config {
    /// Load configuration from verifold.toml.
    /// Checks VERIFOLD_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("VERIFOLD_CONFIG")
            .unwrap_or_else(|_| "verifold.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy verifold.example.toml to verifold.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load verifold.toml if present, otherwise fall back to defaults.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("using default configuration: {e}");
                Self::default()
            }
        }
    }
}
