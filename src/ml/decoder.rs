// ============================================================
// Layer 5 — Best-Span Decoder
// ============================================================
// Inference-time search over the begin and end distributions for
// the highest-scoring answer span. Candidates are all (i, j) with
// i <= j < context_len and j − i < max_span_length, scored by
// begin[i] · end[j].
//
// The comparison is strictly greater-than and candidates are
// visited in increasing-i, increasing-j order, so exact ties
// resolve to the lowest i, then the lowest j.
//
// SQuAD-2.0 mode reserves index 0 of both distributions as the
// no-answer sentinel: it is excluded from the span search and its
// own product begin[0] · end[0] is compared separately at the end,
// overriding the best in-span answer when it wins.

use std::str::FromStr;

use burn::prelude::{Backend, Tensor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::span::{AnswerSpan, Span};

/// Which flavor of the task the distributions were trained for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadVersion {
    /// Every question has an answer in the passage
    V1,

    /// Position 0 is the reserved no-answer sentinel
    V2,
}

impl FromStr for SquadVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.1" | "1" | "v1" => Ok(Self::V1),
            "2.0" | "2" | "v2" => Ok(Self::V2),
            other => Err(format!("unknown squad version '{other}' (expected 1.1 or 2.0)")),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("begin distribution has {begin} entries but end distribution has {end}")]
    LengthMismatch { begin: usize, end: usize },

    #[error("expected a 1D distribution or a single-row 2D one, got {rows} rows")]
    BatchedDistribution { rows: usize },

    #[error("cannot decode a span from an empty distribution")]
    EmptyDistribution,
}

/// Search for the best-scoring answer span.
///
/// `context_len` is the true (unpadded) passage length; positions at
/// or beyond it never become candidates. A returned confidence of 0
/// means no candidate carried probability mass; callers should treat
/// that as a no-answer signal.
pub fn best_span(
    begin: &[f32],
    end: &[f32],
    context_len: usize,
    version: SquadVersion,
    max_span_length: usize,
) -> Result<AnswerSpan, DecodeError> {
    if begin.is_empty() || end.is_empty() {
        return Err(DecodeError::EmptyDistribution);
    }
    if begin.len() != end.len() {
        return Err(DecodeError::LengthMismatch {
            begin: begin.len(),
            end: end.len(),
        });
    }

    let limit = context_len.min(begin.len());

    let mut best = Span::new(0, 0);
    let mut best_score = 0.0f32;

    for (i, &begin_prob) in begin.iter().enumerate().take(limit) {
        if version == SquadVersion::V2 && i == 0 {
            continue;
        }
        for (j, &end_prob) in end.iter().enumerate().take(limit).skip(i) {
            if j - i >= max_span_length {
                break;
            }
            let score = begin_prob * end_prob;
            if score > best_score {
                best = Span::new(i, j);
                best_score = score;
            }
        }
    }

    if version == SquadVersion::V2 {
        let sentinel = begin[0] * end[0];
        if sentinel > best_score {
            best = Span::new(0, 0);
            best_score = sentinel;
        }
    }

    Ok(AnswerSpan {
        span: best,
        confidence: best_score,
    })
}

/// Flatten a [rows, P] probability tensor into a plain distribution,
/// rejecting anything that is not a single example.
pub fn into_distribution<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<f32>, DecodeError> {
    let [rows, _] = tensor.dims();
    if rows != 1 {
        return Err(DecodeError::BatchedDistribution { rows });
    }
    Ok(tensor.into_data().to_vec::<f32>().unwrap_or_default())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_picks_highest_product_span() {
        let answer = best_span(&[0.1, 0.9], &[0.2, 0.8], 2, SquadVersion::V1, 2).unwrap();
        assert_eq!(answer.span, Span::new(1, 1));
        assert_relative_eq!(answer.confidence, 0.72, epsilon = 1e-6);
    }

    #[test]
    fn test_max_span_length_prunes_candidates() {
        // With max length 1 only (0,0) and (1,1) are candidates; the
        // tie resolves to the first one visited.
        let answer = best_span(&[0.5, 0.5], &[0.5, 0.5], 2, SquadVersion::V1, 1).unwrap();
        assert_eq!(answer.span, Span::new(0, 0));
        assert_relative_eq!(answer.confidence, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_end_never_precedes_begin() {
        // All the mass sits on begin=1, end=0, an invalid pairing; the
        // search must fall back to some i <= j candidate.
        let answer = best_span(&[0.0, 1.0], &[1.0, 0.0], 2, SquadVersion::V1, 2).unwrap();
        assert!(answer.span.start <= answer.span.end);
    }

    #[test]
    fn test_context_length_bounds_the_search() {
        // Mass on position 2 is outside the true context of length 2.
        let answer = best_span(&[0.1, 0.2, 0.7], &[0.1, 0.2, 0.7], 2, SquadVersion::V1, 3).unwrap();
        assert_eq!(answer.span, Span::new(1, 1));
        assert_relative_eq!(answer.confidence, 0.04, epsilon = 1e-6);
    }

    #[test]
    fn test_v2_sentinel_overrides_weak_spans() {
        let answer = best_span(&[0.9, 0.05, 0.05], &[0.9, 0.05, 0.05], 3, SquadVersion::V2, 3)
            .unwrap();
        assert_eq!(answer.span, Span::new(0, 0));
        assert_relative_eq!(answer.confidence, 0.81, epsilon = 1e-6);
    }

    #[test]
    fn test_v2_strong_span_beats_sentinel() {
        let answer =
            best_span(&[0.1, 0.8, 0.1], &[0.1, 0.1, 0.8], 3, SquadVersion::V2, 3).unwrap();
        assert_eq!(answer.span, Span::new(1, 2));
        assert_relative_eq!(answer.confidence, 0.64, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_mass_yields_zero_confidence() {
        let answer = best_span(&[0.0, 0.0], &[0.0, 0.0], 2, SquadVersion::V1, 2).unwrap();
        assert_eq!(answer.span, Span::new(0, 0));
        assert_eq!(answer.confidence, 0.0);
    }

    #[test]
    fn test_empty_distribution_is_an_error() {
        let err = best_span(&[], &[], 0, SquadVersion::V1, 2).unwrap_err();
        assert_eq!(err, DecodeError::EmptyDistribution);
    }

    #[test]
    fn test_mismatched_lengths_are_an_error() {
        let err = best_span(&[0.5, 0.5], &[1.0], 2, SquadVersion::V1, 2).unwrap_err();
        assert_eq!(err, DecodeError::LengthMismatch { begin: 2, end: 1 });
    }

    #[test]
    fn test_batched_tensor_is_rejected() {
        type TestBackend = burn::backend::NdArray;
        let device = Default::default();
        let batched = Tensor::<TestBackend, 2>::zeros([3, 4], &device);

        let err = into_distribution(batched).unwrap_err();
        assert_eq!(err, DecodeError::BatchedDistribution { rows: 3 });
    }

    #[test]
    fn test_single_row_tensor_is_accepted() {
        type TestBackend = burn::backend::NdArray;
        let device = Default::default();
        let row = Tensor::<TestBackend, 1>::from_floats([0.3, 0.7].as_slice(), &device)
            .reshape([1, 2]);

        let dist = into_distribution(row).unwrap();
        assert_eq!(dist, vec![0.3, 0.7]);
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("1.1".parse::<SquadVersion>().unwrap(), SquadVersion::V1);
        assert_eq!("2.0".parse::<SquadVersion>().unwrap(), SquadVersion::V2);
        assert!("3.0".parse::<SquadVersion>().is_err());
    }
}
