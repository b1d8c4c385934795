// ============================================================
// Layer 5 — Span-Begin Decoder
// ============================================================
// Scores each passage position as the answer start. The merged
// context and the modeled passage are concatenated per position,
// projected to a scalar by one shared linear layer, and softmaxed
// over the passage axis into a probability distribution.

use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation;

#[derive(Config, Debug)]
pub struct SpanBeginConfig {
    /// Width of the merged context (4H)
    pub merged_dim: usize,

    /// Width of the modeled passage (2 × encoder hidden size)
    pub modeled_dim: usize,
}

impl SpanBeginConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpanBegin<B> {
        SpanBegin {
            dense: LinearConfig::new(self.merged_dim + self.modeled_dim, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct SpanBegin<B: Backend> {
    pub dense: Linear<B>,
}

impl<B: Backend> SpanBegin<B> {
    /// merged: [batch, P, 4H], modeled: [batch, P, M] -> [batch, P]
    ///
    /// Output rows are probability distributions over passage positions.
    pub fn forward(&self, merged: Tensor<B, 3>, modeled: Tensor<B, 3>) -> Tensor<B, 2> {
        let features = Tensor::cat(vec![merged, modeled], 2);
        let scores = self.dense.forward(features).squeeze::<2>(2);
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
        let layer = SpanBeginConfig::new(8, 4).init::<TestBackend>(&device);

        let merged = Tensor::<TestBackend, 3>::random(
            [2, 6, 8],
            burn::tensor::Distribution::Default,
            &device,
        );
        let modeled = Tensor::<TestBackend, 3>::random(
            [2, 6, 4],
            burn::tensor::Distribution::Default,
            &device,
        );

        let begin = layer.forward(merged, modeled);
        assert_eq!(begin.dims(), [2, 6]);

        let data = begin.into_data().to_vec::<f32>().unwrap();
        for row in data.chunks(6) {
            let sum: f32 = row.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
            assert!(row.iter().all(|&p| p >= 0.0));
        }
    }
}
