// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using burn's DataLoader and Adam.
//
// Backend split:
//   - Training runs on Autodiff<Wgpu> for gradients
//   - model.valid() strips autodiff for the validation pass, so
//     the validation batcher uses the inner backend
//
// A non-finite training loss aborts the run immediately: it means
// the optimization has diverged, and continuing would only write
// garbage checkpoints.

use std::sync::Arc;

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::BidafBatcher, dataset::BidafDataset};
use crate::domain::traits::EmbeddingProvider;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::loss;
use crate::ml::model::{Bidaf, BidafConfig};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg: &TrainConfig,
    train_dataset: BidafDataset,
    val_dataset: BidafDataset,
    embedder: Arc<dyn EmbeddingProvider + Send + Sync>,
    ckpt_manager: CheckpointManager,
    metrics_logger: MetricsLogger,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(
        cfg,
        train_dataset,
        val_dataset,
        embedder,
        ckpt_manager,
        metrics_logger,
        device,
    )
}

fn train_loop(
    cfg: &TrainConfig,
    train_dataset: BidafDataset,
    val_dataset: BidafDataset,
    embedder: Arc<dyn EmbeddingProvider + Send + Sync>,
    ckpt_manager: CheckpointManager,
    metrics_logger: MetricsLogger,
    device: burn::backend::wgpu::WgpuDevice,
) -> Result<()> {
    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = BidafConfig::new(cfg.emdim)
        .with_num_highway_layers(cfg.num_highway_layers)
        .with_num_modeling_layers(cfg.num_modeling_layers)
        .with_encoder_dropout(cfg.encoder_dropout)
        .with_decoder_dropout(cfg.decoder_dropout);
    let mut model: Bidaf<MyBackend> = model_cfg.init(&device)?;
    tracing::info!(
        "Model ready: emdim={}, {} highway layers, {} modeling layers",
        cfg.emdim,
        cfg.num_highway_layers,
        cfg.num_modeling_layers,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (autodiff backend) ───────────────────────────────
    let train_batcher = BidafBatcher::<MyBackend>::new(device.clone(), embedder.clone());
    let mut train_builder = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1);
    if cfg.shuffle {
        train_builder = train_builder.shuffle(42);
    }
    let train_loader = train_builder.build(train_dataset);

    // ── Validation data loader (inner backend, no autodiff overhead) ──────────
    let val_batcher = BidafBatcher::<MyInnerBackend>::new(device.clone(), embedder);
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter() {
            let (train_loss, _) = model.forward_loss(
                batch.passage,
                batch.question,
                batch.start_positions,
                batch.end_positions,
            )?;

            let loss_val: f64 = train_loss.clone().into_scalar().elem::<f64>();
            if !loss_val.is_finite() {
                bail!(
                    "training diverged: non-finite loss {loss_val} at epoch {epoch} \
                     batch {train_batches}"
                );
            }
            train_loss_sum += loss_val;
            train_batches += 1;

            // Backward pass + Adam update
            let grads = train_loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() drops autodiff; dropout becomes a no-op there.
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_acc_sum = 0.0f64;
        let mut val_batches = 0usize;

        for batch in val_loader.iter() {
            let output = model_valid.forward(batch.passage, batch.question)?;

            let batch_loss: f64 = loss::negative_avg_log_error(
                &output,
                batch.start_positions.clone(),
                batch.end_positions.clone(),
            )
            .into_scalar()
            .elem::<f64>();

            let batch_acc: f64 =
                loss::span_accuracy(&output, batch.start_positions, batch.end_positions)
                    .into_scalar()
                    .elem::<f64>();

            val_loss_sum += batch_loss;
            val_acc_sum += batch_acc;
            val_batches += 1;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };
        let avg_val_acc = if val_batches > 0 {
            val_acc_sum / val_batches as f64
        } else {
            0.0
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.4}",
            epoch, cfg.epochs, avg_train_loss, avg_val_loss, avg_val_acc,
        );

        let epoch_metrics = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, avg_val_acc);
        if epoch_metrics.is_improvement(best_val_loss) {
            best_val_loss = epoch_metrics.val_loss;
            tracing::info!("New best validation loss: {:.4}", best_val_loss);
        }
        metrics_logger.log(&epoch_metrics)?;

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete");
    Ok(())
}
