// ============================================================
// Layer 5 — Merged Context
// ============================================================
// Fuses the encoded passage with both attention summaries into
// one per-position feature vector of width 4H:
//
//   [h, ĉ, h ⊙ ĉ, h ⊙ q̃]
//
// where h is the encoded passage, ĉ the context-to-query summary
// and q̃ the broadcast query-to-context summary. Parameterless.

use burn::prelude::*;

/// passage: [batch, P, H], c2q: [batch, P, H], q2c: [batch, P, H]
/// -> [batch, P, 4H]
pub fn merged_context<B: Backend>(
    passage: Tensor<B, 3>,
    c2q: Tensor<B, 3>,
    q2c: Tensor<B, 3>,
) -> Tensor<B, 3> {
    let passage_c2q = passage.clone() * c2q.clone();
    let passage_q2c = passage.clone() * q2c;
    Tensor::cat(vec![passage, c2q, passage_c2q, passage_q2c], 2)
}
