// ============================================================
// Layer 4 — Batcher
// ============================================================
// Implements burn's Batcher trait to turn a Vec<BidafSample>
// into device-ready tensors. Passages and questions are embedded
// through the EmbeddingProvider and right-padded with zero
// vectors to the longest sequence IN THIS BATCH, so batch width
// follows the data instead of a fixed global maximum.

use std::sync::Arc;

use burn::data::dataloader::batcher::Batcher;
use burn::prelude::*;

use crate::data::dataset::BidafSample;
use crate::domain::traits::EmbeddingProvider;

// ─── BidafBatch ───────────────────────────────────────────────────────────────
/// A batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct BidafBatch<B: Backend> {
    /// Embedded passages — shape: [batch, P, emdim]
    pub passage: Tensor<B, 3>,

    /// Embedded questions — shape: [batch, Q, emdim]
    pub question: Tensor<B, 3>,

    /// Ground-truth start indices — shape: [batch]
    pub start_positions: Tensor<B, 1, Int>,

    /// Ground-truth end indices — shape: [batch]
    pub end_positions: Tensor<B, 1, Int>,

    /// True (unpadded) passage lengths, one per example
    pub context_lengths: Vec<usize>,
}

// ─── BidafBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device and the embedding provider; generic over
/// the backend so the same batcher serves training and validation.
#[derive(Clone)]
pub struct BidafBatcher<B: Backend> {
    device: B::Device,
    embedder: Arc<dyn EmbeddingProvider + Send + Sync>,
}

impl<B: Backend> BidafBatcher<B> {
    pub fn new(device: B::Device, embedder: Arc<dyn EmbeddingProvider + Send + Sync>) -> Self {
        Self { device, embedder }
    }

    /// Embed and zero-pad one side of the batch into [batch, len, emdim].
    fn embed_side(&self, sequences: Vec<&Vec<String>>, pad_to: usize) -> Tensor<B, 3> {
        let emdim = self.embedder.emdim();
        let batch = sequences.len();

        let mut flat = Vec::with_capacity(batch * pad_to * emdim);
        for tokens in sequences {
            for vector in self.embedder.embed_sequence(tokens, Some(pad_to)) {
                flat.extend_from_slice(&vector);
            }
        }

        Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device).reshape([batch, pad_to, emdim])
    }
}

impl<B: Backend> Batcher<BidafSample, BidafBatch<B>> for BidafBatcher<B> {
    fn batch(&self, items: Vec<BidafSample>) -> BidafBatch<B> {
        // Pad to this batch's own maxima; the loader guarantees
        // non-empty sequences so the fallbacks never trigger in
        // practice.
        let passage_len = items.iter().map(|s| s.context_tokens.len()).max().unwrap_or(1);
        let question_len = items.iter().map(|s| s.question_tokens.len()).max().unwrap_or(1);

        let passage = self.embed_side(
            items.iter().map(|s| &s.context_tokens).collect(),
            passage_len,
        );
        let question = self.embed_side(
            items.iter().map(|s| &s.question_tokens).collect(),
            question_len,
        );

        let starts: Vec<i32> = items.iter().map(|s| s.label.start as i32).collect();
        let ends: Vec<i32> = items.iter().map(|s| s.label.end as i32).collect();

        let start_positions = Tensor::<B, 1, Int>::from_ints(starts.as_slice(), &self.device);
        let end_positions = Tensor::<B, 1, Int>::from_ints(ends.as_slice(), &self.device);

        let context_lengths = items.iter().map(|s| s.context_tokens.len()).collect();

        BidafBatch {
            passage,
            question,
            start_positions,
            end_positions,
            context_lengths,
        }
    }
}

impl<B: Backend> std::fmt::Debug for BidafBatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidafBatcher")
            .field("device", &self.device)
            .field("emdim", &self.embedder.emdim())
            .finish()
    }
}
