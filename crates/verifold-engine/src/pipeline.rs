//! Continuous discovery loop.
//!
//! Each cycle: monitor resources and auto-scale, generate a batch of
//! candidates, analyse them, validate, and store the survivors. Storage
//! errors fall back to the file store and never abort the loop.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use sysinfo::System;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::analysis::analyze_batch;
use crate::config::Config;
use crate::generator::SequenceGenerator;
use crate::genetics::generate_context;
use crate::scoring::build_discovery;
use verifold_common::validation::validate_sequence;
use verifold_db::{Database, DiscoveryRepository, FallbackStore};

/// Event emitted during discovery (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    DiscoveryStored {
        id: String,
        sequence: String,
        validation_score: f64,
        druglikeness_score: f64,
        priority: String,
    },
    CycleComplete {
        cycle: u64,
        sequences: usize,
        valid: usize,
        duplicates: usize,
        sequences_per_second: f64,
    },
    PipelineStatus {
        running: bool,
        message: String,
    },
    Notification {
        message: String,
    },
}

/// Cumulative counters for a discovery run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryMetrics {
    pub cycles_completed: u64,
    pub sequences_processed: u64,
    pub valid_discoveries: u64,
    pub duplicate_discoveries: u64,
    pub storage_failures: u64,
    pub sequences_per_second_avg: f64,
}

/// Compute the next cycle sizes from memory pressure.
///
/// High-memory systems scale the per-cycle sequence count aggressively;
/// everything else adjusts the analysis batch size conservatively.
fn scaled_sizes(
    total_gb: f64,
    used_percent: f64,
    available_gb: f64,
    high_memory_gb: u64,
    sequences_per_cycle: usize,
    batch_size: usize,
) -> (usize, usize) {
    if total_gb >= high_memory_gb as f64 {
        if used_percent > 90.0 {
            let shrunk = ((sequences_per_cycle as f64 * 0.9) as usize).max(256);
            (shrunk, batch_size)
        } else if used_percent < 70.0 && available_gb > 40.0 {
            let grown = ((sequences_per_cycle as f64 * 1.25) as usize).min(1024);
            (grown, batch_size)
        } else {
            (sequences_per_cycle, batch_size)
        }
    } else if used_percent > 85.0 {
        let shrunk = ((batch_size as f64 * 0.8) as usize).max(8);
        (sequences_per_cycle, shrunk)
    } else if used_percent < 60.0 {
        let grown = ((batch_size as f64 * 1.1) as usize).min(512);
        (sequences_per_cycle, grown)
    } else {
        (sequences_per_cycle, batch_size)
    }
}

struct Scaler {
    system: System,
    high_memory_gb: u64,
    enabled: bool,
}

impl Scaler {
    fn new(config: &Config) -> Self {
        Self {
            system: System::new_all(),
            high_memory_gb: config.scaling.high_memory_gb,
            enabled: config.scaling.auto_scale,
        }
    }

    fn adjust(&mut self, sequences_per_cycle: &mut usize, batch_size: &mut usize) {
        if !self.enabled {
            return;
        }
        self.system.refresh_memory();
        let total = self.system.total_memory() as f64;
        let used = self.system.used_memory() as f64;
        if total <= 0.0 {
            return;
        }

        let gib = 1024.0 * 1024.0 * 1024.0;
        let (next_sequences, next_batch) = scaled_sizes(
            total / gib,
            used / total * 100.0,
            (total - used) / gib,
            self.high_memory_gb,
            *sequences_per_cycle,
            *batch_size,
        );

        if next_sequences != *sequences_per_cycle {
            info!(
                from = *sequences_per_cycle,
                to = next_sequences,
                "scaling sequences per cycle"
            );
            *sequences_per_cycle = next_sequences;
        }
        if next_batch != *batch_size {
            info!(from = *batch_size, to = next_batch, "scaling batch size");
            *batch_size = next_batch;
        }
    }
}

/// Handle to a spawned discovery task.
pub struct PipelineHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<DiscoveryMetrics>,
}

impl PipelineHandle {
    /// Spawn the discovery loop on the runtime.
    pub fn spawn(
        config: Config,
        db: Arc<Database>,
        event_tx: broadcast::Sender<PipelineEvent>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_discovery(config, db, event_tx, shutdown_rx));
        Self { shutdown_tx, task }
    }

    /// Request shutdown and wait for the final metrics.
    pub async fn stop(self) -> DiscoveryMetrics {
        let _ = self.shutdown_tx.send(true);
        self.task.await.unwrap_or_default()
    }
}

/// Run the discovery loop until shutdown or the configured cycle limit.
#[instrument(skip_all)]
pub async fn run_discovery(
    config: Config,
    db: Arc<Database>,
    event_tx: broadcast::Sender<PipelineEvent>,
    shutdown_rx: watch::Receiver<bool>,
) -> DiscoveryMetrics {
    let repo = DiscoveryRepository::new(db);
    let fallback = FallbackStore::new(&config.database.fallback_dir);

    let mut generator = match config.pipeline.seed {
        Some(seed) => SequenceGenerator::new(seed),
        None => SequenceGenerator::from_entropy(),
    };
    let mut analysis_rng = StdRng::seed_from_u64(config.pipeline.seed.unwrap_or_else(rand::random));

    let mut scaler = Scaler::new(&config);
    let mut sequences_per_cycle = config.pipeline.sequences_per_cycle;
    let mut batch_size = config.pipeline.batch_size;

    let mut metrics = DiscoveryMetrics::default();
    let started = Instant::now();

    info!(
        sequences_per_cycle,
        batch_size,
        auto_scale = config.scaling.auto_scale,
        "starting continuous discovery"
    );
    let _ = event_tx.send(PipelineEvent::PipelineStatus {
        running: true,
        message: "discovery started".to_string(),
    });

    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        if let Some(max) = config.pipeline.max_cycles {
            if metrics.cycles_completed >= max {
                break;
            }
        }

        scaler.adjust(&mut sequences_per_cycle, &mut batch_size);

        // Generation and analysis are CPU-bound for a full cycle; run them
        // off the async workers so the runtime stays responsive.
        let cycle_target = sequences_per_cycle;
        let chunk_size = batch_size.max(1);
        let assembled = tokio::task::spawn_blocking(move || {
            let sequences = generator.generate_batch(cycle_target);
            let mut records = Vec::new();
            for chunk in sequences.chunks(chunk_size) {
                let analyses = analyze_batch(chunk, &mut analysis_rng);
                for (sequence, analysis) in chunk.iter().zip(analyses.iter()) {
                    let outcome = validate_sequence(sequence);
                    if !outcome.passed {
                        continue;
                    }
                    let genetics =
                        generate_context(sequence, &analysis.virtues.clamped(), &mut analysis_rng);
                    match build_discovery(sequence.clone(), &outcome, analysis, &genetics) {
                        Ok(d) => records.push(d),
                        Err(e) => debug!(error = %e, "failed to assemble record"),
                    }
                }
            }
            (sequences.len(), records, generator, analysis_rng)
        })
        .await;

        let (generated, records) = match assembled {
            Ok((generated, records, gen, rng)) => {
                generator = gen;
                analysis_rng = rng;
                (generated, records)
            }
            Err(e) => {
                error!(error = %e, "analysis task failed");
                break;
            }
        };

        let mut valid_in_cycle = 0usize;
        let mut duplicates_in_cycle = 0usize;

        for discovery in records {
            // Repeat sequences are stored like any other record; the ledger
            // surfaces them through the duplicate-rate statistic.
            match repo.exists_by_sequence_hash(discovery.sequence_hash).await {
                Ok(true) => duplicates_in_cycle += 1,
                Ok(false) => {}
                Err(e) => {
                    debug!(error = %e, "dedup check failed, storing anyway");
                }
            }

            if let Err(e) = repo.insert(&discovery).await {
                error!(error = %e, "ledger insert failed, using file fallback");
                metrics.storage_failures += 1;
                if let Err(fe) = fallback.save(&discovery) {
                    error!(error = %fe, "fallback storage failed, record lost");
                    continue;
                }
            }

            valid_in_cycle += 1;
            if discovery.state_fidelity > 0.8 {
                info!(
                    id = %discovery.id,
                    fidelity = discovery.state_fidelity,
                    coherence = discovery.coherence,
                    "high-fidelity discovery"
                );
            }
            let _ = event_tx.send(PipelineEvent::DiscoveryStored {
                id: discovery.id.to_string(),
                sequence: discovery.sequence.clone(),
                validation_score: discovery.validation_score,
                druglikeness_score: discovery.druglikeness_score,
                priority: discovery.priority.clone(),
            });
        }

        metrics.cycles_completed += 1;
        metrics.sequences_processed += generated as u64;
        metrics.valid_discoveries += valid_in_cycle as u64;
        metrics.duplicate_discoveries += duplicates_in_cycle as u64;
        let elapsed = started.elapsed().as_secs_f64().max(1e-9);
        metrics.sequences_per_second_avg = metrics.sequences_processed as f64 / elapsed;

        let _ = event_tx.send(PipelineEvent::CycleComplete {
            cycle: metrics.cycles_completed,
            sequences: generated,
            valid: valid_in_cycle,
            duplicates: duplicates_in_cycle,
            sequences_per_second: metrics.sequences_per_second_avg,
        });

        if metrics.cycles_completed % config.pipeline.progress_interval.max(1) == 0 {
            log_progress(&metrics, &repo, started).await;
        }

        // Yield so shutdown and subscribers get a chance to run.
        tokio::task::yield_now().await;
    }

    let _ = event_tx.send(PipelineEvent::PipelineStatus {
        running: false,
        message: "discovery stopped".to_string(),
    });
    shutdown_report(&metrics, &repo, started).await;
    metrics
}

async fn log_progress(metrics: &DiscoveryMetrics, repo: &DiscoveryRepository, started: Instant) {
    info!(
        runtime_hours = started.elapsed().as_secs_f64() / 3600.0,
        cycles = metrics.cycles_completed,
        sequences = metrics.sequences_processed,
        discoveries = metrics.valid_discoveries,
        rate = metrics.sequences_per_second_avg,
        "progress update"
    );

    match repo.stats().await {
        Ok(stats) => {
            info!(
                total = stats.total,
                excellent = stats.quality.excellent,
                "ledger statistics"
            );
        }
        Err(e) => debug!(error = %e, "ledger stats unavailable"),
    }
}

async fn shutdown_report(metrics: &DiscoveryMetrics, repo: &DiscoveryRepository, started: Instant) {
    info!(
        runtime_hours = started.elapsed().as_secs_f64() / 3600.0,
        cycles = metrics.cycles_completed,
        sequences = metrics.sequences_processed,
        discoveries = metrics.valid_discoveries,
        duplicates = metrics.duplicate_discoveries,
        storage_failures = metrics.storage_failures,
        rate = metrics.sequences_per_second_avg,
        "shutdown report"
    );

    match repo.stats().await {
        Ok(stats) => {
            info!(
                total = stats.total,
                unique = stats.unique_sequences,
                duplicate_rate = stats.duplicate_rate,
                "final ledger statistics"
            );
        }
        Err(e) => warn!(error = %e, "final ledger stats unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_memory_scaling_grows_sequence_count() {
        let (seq, batch) = scaled_sizes(128.0, 50.0, 60.0, 100, 256, 32);
        assert_eq!(seq, 320);
        assert_eq!(batch, 32);
    }

    #[test]
    fn test_high_memory_scaling_caps_at_1024() {
        let (seq, _) = scaled_sizes(128.0, 50.0, 60.0, 100, 1000, 32);
        assert_eq!(seq, 1024);
    }

    #[test]
    fn test_high_memory_pressure_shrinks_with_floor() {
        let (seq, _) = scaled_sizes(128.0, 95.0, 2.0, 100, 260, 32);
        assert_eq!(seq, 256);
    }

    #[test]
    fn test_standard_system_adjusts_batch_size() {
        let (seq, batch) = scaled_sizes(16.0, 90.0, 1.0, 100, 256, 32);
        assert_eq!(seq, 256);
        assert_eq!(batch, 25);

        let (_, grown) = scaled_sizes(16.0, 40.0, 8.0, 100, 256, 32);
        assert_eq!(grown, 35);

        let (_, floor) = scaled_sizes(16.0, 95.0, 1.0, 100, 256, 8);
        assert_eq!(floor, 8);
    }

    #[test]
    fn test_midband_memory_leaves_sizes_alone() {
        let (seq, batch) = scaled_sizes(16.0, 70.0, 4.0, 100, 256, 32);
        assert_eq!((seq, batch), (256, 32));
    }

    #[tokio::test]
    async fn test_bounded_run_terminates_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(
            Database::open(dir.path().join("ledger").to_str().unwrap())
                .await
                .unwrap(),
        );
        db.initialize().await.unwrap();

        let mut config = Config::default();
        config.pipeline.sequences_per_cycle = 8;
        config.pipeline.batch_size = 4;
        config.pipeline.max_cycles = Some(2);
        config.pipeline.seed = Some(42);
        config.scaling.auto_scale = false;
        config.database.fallback_dir = dir
            .path()
            .join("fallback")
            .to_string_lossy()
            .into_owned();

        let (event_tx, mut event_rx) = broadcast::channel(256);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let metrics = run_discovery(config, db, event_tx, shutdown_rx).await;

        assert_eq!(metrics.cycles_completed, 2);
        assert_eq!(metrics.sequences_processed, 16);
        // Composition rules pass frequently on natural-background draws.
        assert!(metrics.valid_discoveries > 0);

        let mut saw_cycle_complete = false;
        while let Ok(event) = event_rx.try_recv() {
            if matches!(event, PipelineEvent::CycleComplete { .. }) {
                saw_cycle_complete = true;
            }
        }
        assert!(saw_cycle_complete);
    }

    fn bounded_config(dir: &tempfile::TempDir, seed: u64) -> Config {
        let mut config = Config::default();
        config.pipeline.sequences_per_cycle = 8;
        config.pipeline.batch_size = 4;
        config.pipeline.max_cycles = Some(1);
        config.pipeline.seed = Some(seed);
        config.scaling.auto_scale = false;
        config.database.fallback_dir = dir
            .path()
            .join("fallback")
            .to_string_lossy()
            .into_owned();
        config
    }

    #[tokio::test]
    async fn test_repeat_sequences_are_persisted_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(
            Database::open(dir.path().join("ledger").to_str().unwrap())
                .await
                .unwrap(),
        );
        db.initialize().await.unwrap();

        let (event_tx, _event_rx) = broadcast::channel(256);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let first = run_discovery(
            bounded_config(&dir, 7),
            db.clone(),
            event_tx.clone(),
            shutdown_rx.clone(),
        )
        .await;
        assert!(first.valid_discoveries > 0);

        // Same seed regenerates the same sequences. Every record from the
        // second run repeats a fingerprint already in the ledger, and every
        // one of them must still land there.
        let second = run_discovery(bounded_config(&dir, 7), db.clone(), event_tx, shutdown_rx).await;
        assert_eq!(second.duplicate_discoveries, second.valid_discoveries);

        let repo = DiscoveryRepository::new(db);
        let total = repo.count().await.unwrap();
        assert_eq!(total, first.valid_discoveries + second.valid_discoveries);

        let stats = repo.stats().await.unwrap();
        assert!(stats.duplicate_rate > 0.0);
        assert!(stats.unique_sequences < stats.total);
    }

    #[tokio::test]
    async fn test_storage_failure_routes_records_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        // No initialize(): the ledger table is missing, so every insert fails.
        let db = Arc::new(
            Database::open(dir.path().join("ledger").to_str().unwrap())
                .await
                .unwrap(),
        );

        let config = bounded_config(&dir, 42);
        let fallback_dir = config.database.fallback_dir.clone();
        let (event_tx, _event_rx) = broadcast::channel(256);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let metrics = run_discovery(config, db, event_tx, shutdown_rx).await;

        assert_eq!(metrics.cycles_completed, 1);
        assert!(metrics.storage_failures > 0);
        assert_eq!(metrics.storage_failures, metrics.valid_discoveries);

        let recovered = FallbackStore::new(&fallback_dir).load_all().unwrap();
        assert_eq!(recovered.len() as u64, metrics.storage_failures);
    }
}
