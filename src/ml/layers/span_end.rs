// ============================================================
// Layer 5 — Span-End Decoder
// ============================================================
// Re-encodes the passage conditioned on the begin distribution
// before scoring end positions:
//
//   1. expected modeled-passage vector under the begin
//      distribution (weighted sum over positions), tiled to
//      every passage position
//   2. concat [merged, modeled, expected, modeled ⊙ expected]
//   3. one extra bidirectional recurrent pass
//   4. concat with merged context, shared linear to a scalar,
//      softmax over passage positions

use burn::nn::{BiLstm, BiLstmConfig, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation;

#[derive(Config, Debug)]
pub struct SpanEndConfig {
    /// Embedding dimension E; widths below derive from it, matching
    /// the rest of the architecture (H = 2E, merged = 8E, modeled = 2E)
    pub emdim: usize,
}

impl SpanEndConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpanEnd<B> {
        let e = self.emdim;
        SpanEnd {
            // merged (8E) + modeled (2E) + expected (2E) + product (2E)
            encoder: BiLstmConfig::new(14 * e, e, true).init(device),
            // merged (8E) + re-encoded passage (2E)
            dense: LinearConfig::new(10 * e, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct SpanEnd<B: Backend> {
    pub encoder: BiLstm<B>,
    pub dense: Linear<B>,
}

impl<B: Backend> SpanEnd<B> {
    /// merged: [batch, P, 8E], modeled: [batch, P, 2E],
    /// begin: [batch, P] -> [batch, P]
    pub fn forward(
        &self,
        merged: Tensor<B, 3>,
        modeled: Tensor<B, 3>,
        begin: Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let [batch, p, m] = modeled.dims();

        // Expectation of the modeled passage under the begin
        // distribution, tiled back to every position.
        let weights = begin.unsqueeze_dim::<3>(2).expand([batch, p, m]);
        let expected = (weights * modeled.clone()).sum_dim(1); // [batch, 1, 2E]
        let expected = expected.expand([batch, p, m]); // [batch, P, 2E]

        let features = Tensor::cat(
            vec![
                merged.clone(),
                modeled.clone(),
                expected.clone(),
                modeled * expected,
            ],
            2,
        ); // [batch, P, 14E]

        let (reencoded, _state) = self.encoder.forward(features, None); // [batch, P, 2E]

        let scores = self
            .dense
            .forward(Tensor::cat(vec![merged, reencoded], 2))
            .squeeze::<2>(2);
        activation::softmax(scores, 1)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_rows_are_probability_distributions() {
        let device = Default::default();
        let layer = SpanEndConfig::new(2).init::<TestBackend>(&device);

        let merged = Tensor::<TestBackend, 3>::random(
            [2, 5, 16],
            burn::tensor::Distribution::Default,
            &device,
        );
        let modeled = Tensor::<TestBackend, 3>::random(
            [2, 5, 4],
            burn::tensor::Distribution::Default,
            &device,
        );
        // A valid begin distribution: uniform over the 5 positions.
        let begin = Tensor::<TestBackend, 2>::full([2, 5], 0.2, &device);

        let end = layer.forward(merged, modeled, begin);
        assert_eq!(end.dims(), [2, 5]);

        let data = end.into_data().to_vec::<f32>().unwrap();
        for row in data.chunks(5) {
            let sum: f32 = row.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
            assert!(row.iter().all(|&p| p >= 0.0));
        }
    }
}
