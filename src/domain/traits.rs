// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the model core and its collaborators.
// By programming against traits instead of concrete types,
// implementations can be swapped without touching the code
// that uses them.

use anyhow::Result;

use crate::domain::answer::Prediction;

// ─── EmbeddingProvider ────────────────────────────────────────────────────────
/// Any component that can turn tokens into fixed-width numeric vectors.
///
/// The model core never interprets tokens; it only consumes vectors of
/// width `emdim()`. Every token must map to some vector, including
/// out-of-vocabulary ones.
///
/// Implementations:
///   - WordVectors → pre-trained GloVe-format vectors from a text file
pub trait EmbeddingProvider {
    /// Width of every vector this provider produces
    fn emdim(&self) -> usize;

    /// Embed a single token. Must always return a vector of width
    /// `emdim()`, falling back to a deterministic out-of-vocabulary
    /// vector for unknown tokens.
    fn embed(&self, token: &str) -> Vec<f32>;

    /// Embed an ordered token sequence, optionally right-padding with
    /// zero vectors (or truncating) to a fixed length.
    fn embed_sequence(&self, tokens: &[String], pad_to: Option<usize>) -> Vec<Vec<f32>> {
        let target = pad_to.unwrap_or(tokens.len());
        let mut vectors: Vec<Vec<f32>> = tokens
            .iter()
            .take(target)
            .map(|t| self.embed(t))
            .collect();
        while vectors.len() < target {
            vectors.push(vec![0.0; self.emdim()]);
        }
        vectors
    }
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Any component that can answer a question against a passage.
///
/// Implementations:
///   - PredictUseCase → loads a trained model from checkpoint
pub trait QuestionAnswerer {
    /// Predict the answer span for `question` inside `passage`.
    fn answer(&self, passage: &str, question: &str) -> Result<Prediction>;
}
