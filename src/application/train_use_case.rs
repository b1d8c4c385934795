// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load word vectors          (Layer 4 - data)
//   Step 2: Load train and dev splits  (Layer 4 - data)
//   Step 3: Build datasets             (Layer 4 - data)
//   Step 4: Save config                (Layer 6 - infra)
//   Step 5: Run training loop          (Layer 5 - ml)

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{dataset::BidafDataset, embeddings::WordVectors, loader::SquadDirLoader};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialized to JSON next to
// the checkpoints so inference can rebuild the exact architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir: String,
    pub embeddings_file: String,
    pub checkpoint_dir: String,
    pub emdim: usize,
    pub num_highway_layers: usize,
    pub num_modeling_layers: usize,
    pub encoder_dropout: f64,
    pub decoder_dropout: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub lr: f64,
    pub shuffle: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/squad".to_string(),
            embeddings_file: "data/glove.txt".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            emdim: 100,
            num_highway_layers: 2,
            num_modeling_layers: 1,
            encoder_dropout: 0.0,
            decoder_dropout: 0.0,
            batch_size: 16,
            epochs: 10,
            lr: 1e-3,
            shuffle: true,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load pre-trained word vectors ─────────────────────────────
        tracing::info!("Loading word vectors from '{}'", cfg.embeddings_file);
        let embedder = Arc::new(WordVectors::load(&cfg.embeddings_file, cfg.emdim)?);

        // ── Step 2: Load the train and dev splits ─────────────────────────────
        let loader = SquadDirLoader::new(&cfg.data_dir);
        let train_samples = loader.load_split("train")?;
        let val_samples = loader.load_split("dev")?;
        tracing::info!(
            "Loaded {} train and {} dev examples",
            train_samples.len(),
            val_samples.len(),
        );

        // ── Step 3: Build burn datasets ───────────────────────────────────────
        let train_dataset = BidafDataset::new(train_samples);
        let val_dataset = BidafDataset::new(val_samples);

        // ── Step 4: Save config so inference can rebuild the model ────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        let metrics_logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 5: Run training loop (Layer 5) ───────────────────────────────
        run_training(
            cfg,
            train_dataset,
            val_dataset,
            embedder,
            ckpt_manager,
            metrics_logger,
        )?;

        Ok(())
    }
}
