// ============================================================
// Layer 5 — Bidirectional Attention
// ============================================================
// The two attention directions computed from the similarity
// matrix. Neither owns learned parameters, so both are plain
// tensor functions rather than modules.
//
//   context-to-query: one question summary PER passage position
//   query-to-context: ONE passage summary, broadcast to all
//                     passage positions

use burn::prelude::*;
use burn::tensor::activation;

/// Context-to-query attention.
///
/// similarity: [batch, P, Q], question: [batch, Q, H] -> [batch, P, H]
///
/// Each similarity row is softmaxed over the question axis and used
/// to take a weighted sum of the encoded question vectors.
pub fn context_to_query<B: Backend>(
    similarity: Tensor<B, 3>,
    question: Tensor<B, 3>,
) -> Tensor<B, 3> {
    let weights = activation::softmax(similarity, 2);
    weights.matmul(question)
}

/// Query-to-context attention.
///
/// similarity: [batch, P, Q], passage: [batch, P, H] -> [batch, P, H]
///
/// The per-position maxima over the question axis are softmaxed over
/// the passage axis, giving a single attention distribution over
/// passage positions. The resulting summary vector is tiled to every
/// passage position.
pub fn query_to_context<B: Backend>(
    similarity: Tensor<B, 3>,
    passage: Tensor<B, 3>,
) -> Tensor<B, 3> {
    let [batch, p, h] = passage.dims();

    let max_per_row = similarity.max_dim(2).squeeze::<2>(2); // [batch, P]
    let weights = activation::softmax(max_per_row, 1).unsqueeze_dim::<3>(1); // [batch, 1, P]

    let summary = weights.matmul(passage); // [batch, 1, H]
    summary.expand([batch, p, h])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_uniform_similarity_averages_question() {
        // All-zero similarity scores softmax to uniform weights, so
        // every passage position receives the mean question vector.
        let device = Default::default();
        let similarity = Tensor::<TestBackend, 3>::zeros([1, 2, 3], &device);
        let question = Tensor::<TestBackend, 1>::from_floats(
            [1.0, 10.0, 2.0, 20.0, 3.0, 30.0].as_slice(),
            &device,
        )
        .reshape([1, 3, 2]);

        let attended = context_to_query(similarity, question);
        assert_eq!(attended.dims(), [1, 2, 2]);

        let data = attended.into_data().to_vec::<f32>().unwrap();
        for p in 0..2 {
            assert_relative_eq!(data[p * 2], 2.0, epsilon = 1e-5);
            assert_relative_eq!(data[p * 2 + 1], 20.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_query_to_context_broadcasts_one_summary() {
        let device = Default::default();
        let similarity = Tensor::<TestBackend, 3>::zeros([1, 3, 2], &device);
        let passage = Tensor::<TestBackend, 1>::from_floats(
            [1.0, 4.0, 2.0, 5.0, 3.0, 6.0].as_slice(),
            &device,
        )
        .reshape([1, 3, 2]);

        let attended = query_to_context(similarity, passage);
        assert_eq!(attended.dims(), [1, 3, 2]);

        // Uniform weights over three positions -> mean vector (2, 5),
        // identical at every passage position.
        let data = attended.into_data().to_vec::<f32>().unwrap();
        for p in 0..3 {
            assert_relative_eq!(data[p * 2], 2.0, epsilon = 1e-5);
            assert_relative_eq!(data[p * 2 + 1], 5.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_attention_weights_follow_similarity_peaks() {
        // A strongly peaked similarity row should pull the attended
        // vector toward the peaked question position.
        let device = Default::default();
        let similarity = Tensor::<TestBackend, 1>::from_floats(
            [50.0, 0.0, 0.0, 50.0].as_slice(),
            &device,
        )
        .reshape([1, 2, 2]);
        let question = Tensor::<TestBackend, 1>::from_floats(
            [1.0, 0.0, 0.0, 1.0].as_slice(),
            &device,
        )
        .reshape([1, 2, 2]);

        let attended = context_to_query(similarity, question);
        let data = attended.into_data().to_vec::<f32>().unwrap();

        // Row 0 attends to question position 0, row 1 to position 1.
        assert_relative_eq!(data[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(data[1], 0.0, epsilon = 1e-4);
        assert_relative_eq!(data[2], 0.0, epsilon = 1e-4);
        assert_relative_eq!(data[3], 1.0, epsilon = 1e-4);
    }
}
