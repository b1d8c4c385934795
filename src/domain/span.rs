// ============================================================
// Layer 3 — Span Domain Types
// ============================================================
// The central concept of extractive machine comprehension:
// the answer is a SPAN within the passage, identified by a
// start index and an end index into the token sequence.
// The model never generates text; it points at where the
// answer already lives in the passage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An inclusive (start, end) pair of token indices into the passage.
///
/// Produced by the best-span decoder, which guarantees start <= end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Index of the FIRST answer token in the passage
    pub start: usize,

    /// Index of the LAST answer token (inclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens covered by the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

/// A decoded answer span together with its confidence score.
///
/// The confidence is the product of the selected begin and end
/// probabilities. It is not a calibrated probability; a value of
/// zero means no candidate carried any probability mass and should
/// be read as a no-answer signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerSpan {
    pub span: Span,
    pub confidence: f32,
}

/// Raised when a ground-truth label pair is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpanError {
    #[error("span start {start} is after span end {end}")]
    StartAfterEnd { start: usize, end: usize },
}

/// A ground-truth (start, end) label pair from the training data.
///
/// Unlike `Span`, construction is fallible: training files are
/// external input, so the start <= end invariant is enforced here
/// instead of assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanLabel {
    pub start: usize,
    pub end: usize,
}

impl SpanLabel {
    pub fn new(start: usize, end: usize) -> Result<Self, SpanError> {
        if start > end {
            return Err(SpanError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn span_length(&self) -> usize {
        self.end - self.start + 1
    }
}
