// ============================================================
// Layer 3 — Prediction Domain Types
// ============================================================
// What a caller gets back from a prediction: the token-level
// answer span, its confidence, and (when the passage contains
// an answer) the materialized answer text with its byte offsets
// into the original passage.

use serde::{Deserialize, Serialize};

use crate::domain::span::AnswerSpan;

/// The answer text sliced out of the original passage.
///
/// `byte_start..byte_end` is the half-open byte range of the answer
/// inside the passage string handed to the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerText {
    pub text: String,
    pub byte_start: usize,
    pub byte_end: usize,
}

/// The full result of one prediction call.
///
/// `answer` is `None` when the model ran in SQuAD-2.0 mode and the
/// no-answer sentinel won the span search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub answer_span: AnswerSpan,
    pub answer: Option<AnswerText>,
}

impl Prediction {
    pub fn is_no_answer(&self) -> bool {
        self.answer.is_none()
    }
}
