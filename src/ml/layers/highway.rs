// ============================================================
// Layer 5 — Highway Transform
// ============================================================
// A gated per-position residual transform. For every position x:
//
//   T = sigmoid(W_t·x + b_t)      transform gate
//   H = relu(W_h·x + b_h)         candidate projection
//   y = T ⊙ H + (1 − T) ⊙ x
//
// b_t is initialized to a negative constant so the gate starts
// close to 0 and the layer passes its input through almost
// unchanged early in training.
//
// One Highway instance is shared between the passage and the
// question sequences: the caller applies the same module to both.

use burn::module::Param;
use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation;

#[derive(Config, Debug)]
pub struct HighwayConfig {
    /// Width of the per-position vectors; output width is identical
    pub dim: usize,

    /// Constant initial value of the transform-gate bias
    #[config(default = "-1.0")]
    pub transform_gate_bias: f64,
}

impl HighwayConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Highway<B> {
        let mut transform = LinearConfig::new(self.dim, self.dim).init(device);

        // Overwrite the default bias with the configured constant;
        // the gate must start in the carry-dominated regime.
        let gate_bias = Tensor::<B, 1>::full([self.dim], self.transform_gate_bias, device);
        transform.bias = Some(Param::from_tensor(gate_bias));

        let candidate = LinearConfig::new(self.dim, self.dim).init(device);

        Highway { transform, candidate }
    }
}

/// Per-position gated projection, applied independently to every
/// position of a sequence (the linear layers act on the last axis).
#[derive(Module, Debug)]
pub struct Highway<B: Backend> {
    pub transform: Linear<B>,
    pub candidate: Linear<B>,
}

impl<B: Backend> Highway<B> {
    /// input: [..., dim] -> output: [..., dim]
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let gate = activation::sigmoid(self.transform.forward(input.clone()));
        let candidate = activation::relu(self.candidate.forward(input.clone()));
        let carry = gate.ones_like() - gate.clone();
        gate * candidate + carry * input
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_output_shape_equals_input_shape() {
        let device = Default::default();
        let layer = HighwayConfig::new(6).init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 3>::random(
            [2, 5, 6],
            burn::tensor::Distribution::Default,
            &device,
        );
        let output = layer.forward(input.clone());

        assert_eq!(output.dims(), input.dims());
    }

    #[test]
    fn test_very_negative_gate_bias_carries_input() {
        // With the gate bias pushed far negative, T ≈ 0 and the layer
        // reduces to the identity. Zero input must come out ≈ zero.
        let device = Default::default();
        let layer = HighwayConfig::new(8)
            .with_transform_gate_bias(-12.0)
            .init::<TestBackend>(&device);

        let input = Tensor::<TestBackend, 3>::zeros([1, 4, 8], &device);
        let output = layer.forward(input);

        let max_abs: f32 = output.abs().max().into_scalar();
        assert!(max_abs < 1e-4, "expected carry-dominated output, got {max_abs}");
    }

    #[test]
    fn test_stacked_layers_preserve_shape() {
        let device = Default::default();
        let layers: Vec<Highway<TestBackend>> =
            (0..2).map(|_| HighwayConfig::new(4).init(&device)).collect();

        let mut x = Tensor::<TestBackend, 3>::random(
            [1, 3, 4],
            burn::tensor::Distribution::Default,
            &device,
        );
        for layer in &layers {
            x = layer.forward(x);
        }

        assert_eq!(x.dims(), [1, 3, 4]);
    }
}
