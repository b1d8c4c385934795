// ============================================================
// Layer 5 — Training Loss and Accuracy Metric
// ============================================================
// Both operate on the combined output and a batch of ground-truth
// (start, end) index pairs:
//
//   loss     = −mean(log p_begin[start] + log p_end[end])
//   accuracy =  mean((p_begin[start] + p_end[end]) / 2)
//
// The selected probabilities are clamped away from zero before the
// logarithm so a confidently wrong model yields a large finite loss
// instead of infinity. Accuracy is diagnostic only and never drives
// optimization.

use burn::prelude::*;

use crate::ml::model::BidafOutput;

/// Floor applied to probabilities before taking the log.
const PROB_FLOOR: f64 = 1e-8;

/// Negative average log error over a batch.
///
/// starts, ends: [batch] inclusive passage indices. Returns a scalar
/// tensor; batch order does not affect the result (mean reduction).
pub fn negative_avg_log_error<B: Backend>(
    output: &BidafOutput<B>,
    starts: Tensor<B, 1, Int>,
    ends: Tensor<B, 1, Int>,
) -> Tensor<B, 1> {
    let p_start = output
        .begin()
        .gather(1, starts.unsqueeze_dim(1))
        .clamp_min(PROB_FLOOR); // [batch, 1]
    let p_end = output
        .end()
        .gather(1, ends.unsqueeze_dim(1))
        .clamp_min(PROB_FLOOR);

    let log_sum = (p_start.log() + p_end.log()).squeeze::<1>(1); // [batch]
    log_sum.mean().neg()
}

/// Probability mass the model assigned to the true span endpoints,
/// averaged over the batch. 1.0 means both endpoints were predicted
/// with full confidence for every example.
pub fn span_accuracy<B: Backend>(
    output: &BidafOutput<B>,
    starts: Tensor<B, 1, Int>,
    ends: Tensor<B, 1, Int>,
) -> Tensor<B, 1> {
    let p_start = output.begin().gather(1, starts.unsqueeze_dim(1));
    let p_end = output.end().gather(1, ends.unsqueeze_dim(1));

    ((p_start + p_end) / 2.0).squeeze::<1>(1).mean()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type TestBackend = burn::backend::NdArray;

    /// Build a combined output from explicit begin/end rows.
    fn output_from(
        begin: Vec<Vec<f32>>,
        end: Vec<Vec<f32>>,
        device: &<TestBackend as Backend>::Device,
    ) -> BidafOutput<TestBackend> {
        let batch = begin.len();
        let p = begin[0].len();
        let mut flat = Vec::new();
        for (b, e) in begin.iter().zip(end.iter()) {
            flat.extend_from_slice(b);
            flat.extend_from_slice(e);
        }
        BidafOutput {
            combined: Tensor::<TestBackend, 1>::from_floats(flat.as_slice(), device)
                .reshape([batch, 2, p]),
        }
    }

    fn indices(
        values: &[i32],
        device: &<TestBackend as Backend>::Device,
    ) -> Tensor<TestBackend, 1, Int> {
        Tensor::from_ints(values, device)
    }

    #[test]
    fn test_loss_matches_hand_computation() {
        let device = Default::default();
        let output = output_from(
            vec![vec![0.25, 0.75], vec![0.5, 0.5]],
            vec![vec![0.1, 0.9], vec![0.6, 0.4]],
            &device,
        );
        let starts = indices(&[1, 0], &device);
        let ends = indices(&[1, 0], &device);

        let loss: f32 = negative_avg_log_error(&output, starts, ends).into_scalar();

        let expected = -(((0.75f32).ln() + (0.9f32).ln()) + ((0.5f32).ln() + (0.6f32).ln())) / 2.0;
        assert_relative_eq!(loss, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_loss_is_invariant_to_batch_order() {
        let device = Default::default();
        let forward = output_from(
            vec![vec![0.2, 0.8], vec![0.7, 0.3]],
            vec![vec![0.4, 0.6], vec![0.9, 0.1]],
            &device,
        );
        let reversed = output_from(
            vec![vec![0.7, 0.3], vec![0.2, 0.8]],
            vec![vec![0.9, 0.1], vec![0.4, 0.6]],
            &device,
        );

        let a: f32 =
            negative_avg_log_error(&forward, indices(&[1, 0], &device), indices(&[0, 0], &device))
                .into_scalar();
        let b: f32 =
            negative_avg_log_error(&reversed, indices(&[0, 1], &device), indices(&[0, 0], &device))
                .into_scalar();

        assert_relative_eq!(a, b, epsilon = 1e-6);
    }

    #[test]
    fn test_loss_stays_finite_on_zero_probability() {
        let device = Default::default();
        let output = output_from(vec![vec![0.0, 1.0]], vec![vec![0.0, 1.0]], &device);
        let starts = indices(&[0], &device);
        let ends = indices(&[0], &device);

        let loss: f32 = negative_avg_log_error(&output, starts, ends).into_scalar();
        assert!(loss.is_finite(), "clamping must keep the loss finite");
        assert!(loss > 0.0);
    }

    #[test]
    fn test_accuracy_is_one_for_perfect_predictions() {
        let device = Default::default();
        let output = output_from(
            vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 0.0]],
            vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]],
            &device,
        );
        let starts = indices(&[1, 0], &device);
        let ends = indices(&[2, 0], &device);

        let accuracy: f32 = span_accuracy(&output, starts, ends).into_scalar();
        assert_relative_eq!(accuracy, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_accuracy_averages_endpoint_mass() {
        let device = Default::default();
        let output = output_from(vec![vec![0.6, 0.4]], vec![vec![0.2, 0.8]], &device);
        let starts = indices(&[0], &device);
        let ends = indices(&[1], &device);

        let accuracy: f32 = span_accuracy(&output, starts, ends).into_scalar();
        assert_relative_eq!(accuracy, (0.6 + 0.8) / 2.0, epsilon = 1e-6);
    }
}
