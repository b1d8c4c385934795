// ============================================================
// Layer 5 — Similarity Scorer
// ============================================================
// Produces the passage-length × question-length alignment matrix
// at the heart of bidirectional attention. Both encoded sequences
// are broadcast to a (P, Q, H) grid, and every (p, q) cell is
// scored by a single learned linear projection over
// [passage; question; passage ⊙ question].
//
// No nonlinearity is applied: the projection output IS the score.

use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;

#[derive(Config, Debug)]
pub struct SimilarityConfig {
    /// Width H of the encoded vectors (2 × encoder hidden size)
    pub encoded_dim: usize,
}

impl SimilarityConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Similarity<B> {
        Similarity {
            project: LinearConfig::new(3 * self.encoded_dim, 1).init(device),
        }
    }
}

/// Trilinear similarity between every passage and question position.
#[derive(Module, Debug)]
pub struct Similarity<B: Backend> {
    pub project: Linear<B>,
}

impl<B: Backend> Similarity<B> {
    /// passage: [batch, P, H], question: [batch, Q, H] -> [batch, P, Q]
    ///
    /// Both P and Q must be at least 1; the caller guarantees
    /// non-empty sequences.
    pub fn forward(&self, passage: Tensor<B, 3>, question: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, p, h] = passage.dims();
        let [_, q, _] = question.dims();

        // Tile the passage along the question axis and the question
        // along the passage axis, giving two [batch, P, Q, H] views.
        let context = passage.unsqueeze_dim::<4>(2).expand([batch, p, q, h]);
        let query = question.unsqueeze_dim::<4>(1).expand([batch, p, q, h]);
        let product = context.clone() * query.clone();

        // [batch, P, Q, 3H] -> linear -> [batch, P, Q, 1] -> [batch, P, Q]
        let features = Tensor::cat(vec![context, query, product], 3);
        self.project.forward(features).squeeze::<3>(3)
    }
}
