// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using burn's CompactRecorder
// (MessagePack + gzip, type-safe on load).
//
// Every named component records to its own file so components
// round-trip independently and a partial architecture can reload
// just the pieces it has:
//
//   checkpoints/
//     epoch_1/
//       highway.mpk.gz      span_begin.mpk.gz
//       encoder.mpk.gz      span_end.mpk.gz
//       similarity.mpk.gz
//       modeling.mpk.gz
//     latest_epoch.json     which epoch was last saved
//     train_config.json     architecture hyperparameters
//
// The attention directions, merge and combine steps own no weights
// and therefore have nothing to record.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use burn::prelude::*;
use burn::record::{CompactRecorder, Recorder};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Bidaf;

/// Manages saving and loading of model checkpoints inside one
/// directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Record every weighted component of `model` under
    /// `{dir}/epoch_{epoch}/` and advance the latest-epoch pointer.
    pub fn save_model<B: Backend>(&self, model: &Bidaf<B>, epoch: usize) -> Result<()> {
        let epoch_dir = self.dir.join(format!("epoch_{epoch}"));
        fs::create_dir_all(&epoch_dir)
            .with_context(|| format!("cannot create '{}'", epoch_dir.display()))?;

        let recorder = CompactRecorder::new();

        recorder
            .record(model.highway.clone().into_record(), epoch_dir.join("highway"))
            .context("failed to save highway weights")?;
        recorder
            .record(model.encoder.clone().into_record(), epoch_dir.join("encoder"))
            .context("failed to save encoder weights")?;
        recorder
            .record(
                model.similarity.clone().into_record(),
                epoch_dir.join("similarity"),
            )
            .context("failed to save similarity weights")?;
        recorder
            .record(model.modeling.clone().into_record(), epoch_dir.join("modeling"))
            .context("failed to save modeling weights")?;
        recorder
            .record(
                model.span_begin.clone().into_record(),
                epoch_dir.join("span_begin"),
            )
            .context("failed to save span-begin weights")?;
        recorder
            .record(model.span_end.clone().into_record(), epoch_dir.join("span_end"))
            .context("failed to save span-end weights")?;

        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .context("failed to write latest_epoch.json")?;

        tracing::debug!("Saved checkpoint for epoch {}", epoch);
        Ok(())
    }

    /// Restore every component of `model` from the latest checkpoint.
    ///
    /// The model must have been built with the same architecture
    /// config or loading fails with a type error.
    pub fn load_model<B: Backend>(&self, model: Bidaf<B>, device: &B::Device) -> Result<Bidaf<B>> {
        let epoch = self.latest_epoch()?;
        self.load_model_at(model, device, epoch)
    }

    /// Restore from one specific epoch.
    pub fn load_model_at<B: Backend>(
        &self,
        mut model: Bidaf<B>,
        device: &B::Device,
        epoch: usize,
    ) -> Result<Bidaf<B>> {
        let epoch_dir = self.dir.join(format!("epoch_{epoch}"));
        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let recorder = CompactRecorder::new();
        let missing = |name: &str| {
            format!(
                "cannot load '{}' from '{}'; has the model been trained?",
                name,
                epoch_dir.display()
            )
        };

        let record = recorder
            .load(epoch_dir.join("highway"), device)
            .with_context(|| missing("highway"))?;
        model.highway = model.highway.load_record(record);

        let record = recorder
            .load(epoch_dir.join("encoder"), device)
            .with_context(|| missing("encoder"))?;
        model.encoder = model.encoder.load_record(record);

        let record = recorder
            .load(epoch_dir.join("similarity"), device)
            .with_context(|| missing("similarity"))?;
        model.similarity = model.similarity.load_record(record);

        let record = recorder
            .load(epoch_dir.join("modeling"), device)
            .with_context(|| missing("modeling"))?;
        model.modeling = model.modeling.load_record(record);

        let record = recorder
            .load(epoch_dir.join("span_begin"), device)
            .with_context(|| missing("span_begin"))?;
        model.span_begin = model.span_begin.load_record(record);

        let record = recorder
            .load(epoch_dir.join("span_end"), device)
            .with_context(|| missing("span_end"))?;
        model.span_end = model.span_end.load_record(record);

        Ok(model)
    }

    /// Persist the training configuration so inference can rebuild
    /// the exact architecture before loading weights into it.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json).with_context(|| format!("cannot write '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "cannot read '{}'; run 'train' before 'predict'",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");
        let s = fs::read_to_string(&path)
            .context("cannot find 'latest_epoch.json'; run 'train' first")?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
