// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads a trained model from checkpoint and turns a tokenized
// (passage, question) pair into an answer span with a confidence
// score. Weights are read-only here; one Inferencer can serve any
// number of prediction calls.

use anyhow::Result;
use burn::prelude::*;

use crate::domain::span::AnswerSpan;
use crate::domain::traits::EmbeddingProvider;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::decoder::{self, SquadVersion};
use crate::ml::model::{Bidaf, BidafConfig};

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer {
    model: Bidaf<InferBackend>,
    device: burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    /// Rebuild the architecture from the saved config and restore the
    /// latest checkpointed weights into it. Dropout is zeroed; it has
    /// no business at inference time.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg = ckpt_manager.load_config()?;

        let model: Bidaf<InferBackend> = BidafConfig::new(cfg.emdim)
            .with_num_highway_layers(cfg.num_highway_layers)
            .with_num_modeling_layers(cfg.num_modeling_layers)
            .init(&device)?;
        let model = ckpt_manager.load_model(model, &device)?;

        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Predict the best answer span for one example.
    ///
    /// `passage_tokens` and `question_tokens` must be non-empty; the
    /// forward pass rejects empty sequences.
    pub fn predict(
        &self,
        passage_tokens: &[String],
        question_tokens: &[String],
        embedder: &dyn EmbeddingProvider,
        version: SquadVersion,
        max_span_length: usize,
    ) -> Result<AnswerSpan> {
        let passage = self.embed_one(passage_tokens, embedder);
        let question = self.embed_one(question_tokens, embedder);

        let output = self.model.forward(passage, question)?;

        let begin = decoder::into_distribution(output.begin())?;
        let end = decoder::into_distribution(output.end())?;

        let answer = decoder::best_span(
            &begin,
            &end,
            passage_tokens.len(),
            version,
            max_span_length,
        )?;

        tracing::debug!(
            "Span [{},{}] conf={:.4}",
            answer.span.start,
            answer.span.end,
            answer.confidence,
        );
        Ok(answer)
    }

    /// Embed one sequence as a batch of one: [1, len, emdim].
    fn embed_one(&self, tokens: &[String], embedder: &dyn EmbeddingProvider) -> Tensor<InferBackend, 3> {
        let emdim = embedder.emdim();
        let flat: Vec<f32> = embedder
            .embed_sequence(tokens, None)
            .into_iter()
            .flatten()
            .collect();

        Tensor::<InferBackend, 1>::from_floats(flat.as_slice(), &self.device).reshape([
            1,
            tokens.len(),
            emdim,
        ])
    }
}
