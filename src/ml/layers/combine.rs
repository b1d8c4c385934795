// ============================================================
// Layer 5 — Output Combiner
// ============================================================
// Stacks the begin and end distributions into one tensor of
// shape [batch, 2, P], begin at index 0 and end at index 1.
// Pure reshape; no learned parameters.

use burn::prelude::*;

/// begin: [batch, P], end: [batch, P] -> [batch, 2, P]
pub fn combine_outputs<B: Backend>(begin: Tensor<B, 2>, end: Tensor<B, 2>) -> Tensor<B, 3> {
    Tensor::stack(vec![begin, end], 1)
}
