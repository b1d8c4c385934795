// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Loads a trained checkpoint and answers questions against raw
// passage text. The model core sees only token vectors and
// returns only a token span; this layer owns the text boundary
// in both directions:
//
//   text  → tokens        (whitespace pre-tokenization)
//   span  → answer text   (token byte offsets into the passage)

use anyhow::{ensure, Result};

use crate::data::embeddings::WordVectors;
use crate::data::tokenize::tokenize_with_offsets;
use crate::domain::answer::{AnswerText, Prediction};
use crate::domain::traits::QuestionAnswerer;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::decoder::SquadVersion;
use crate::ml::inferencer::Inferencer;

/// Options controlling a prediction call, mirroring the knobs a
/// trained model exposes to callers.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    pub squad_version: SquadVersion,
    pub max_span_length: usize,
    pub lowercase: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            squad_version: SquadVersion::V1,
            max_span_length: 25,
            lowercase: true,
        }
    }
}

pub struct PredictUseCase {
    inferencer: Inferencer,
    embedder: WordVectors,
    options: PredictOptions,
}

impl PredictUseCase {
    /// Load everything needed for prediction: the saved architecture
    /// config, the checkpointed weights and the word vectors used
    /// during training.
    pub fn new(checkpoint_dir: &str, options: PredictOptions) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir);
        let cfg = ckpt_manager.load_config()?;

        let embedder = WordVectors::load(&cfg.embeddings_file, cfg.emdim)?;
        let inferencer = Inferencer::from_checkpoint(&ckpt_manager)?;

        Ok(Self {
            inferencer,
            embedder,
            options,
        })
    }
}

impl QuestionAnswerer for PredictUseCase {
    /// Predict the answer span for `question` inside `passage` and
    /// materialize the answer text from the span's byte offsets.
    fn answer(&self, passage: &str, question: &str) -> Result<Prediction> {
        let passage_text = if self.options.lowercase {
            passage.trim().to_lowercase()
        } else {
            passage.trim().to_string()
        };
        let question_text = if self.options.lowercase {
            question.trim().to_lowercase()
        } else {
            question.trim().to_string()
        };

        let (passage_tokens, offsets) = tokenize_with_offsets(&passage_text)?;
        let (question_tokens, _) = tokenize_with_offsets(&question_text)?;
        ensure!(!passage_tokens.is_empty(), "passage contains no tokens");
        ensure!(!question_tokens.is_empty(), "question contains no tokens");

        let answer_span = self.inferencer.predict(
            &passage_tokens,
            &question_tokens,
            &self.embedder,
            self.options.squad_version,
            self.options.max_span_length,
        )?;

        // In 2.0 mode the (0,0) sentinel means the passage does not
        // answer the question; there is no text to materialize.
        let no_answer = self.options.squad_version == SquadVersion::V2
            && answer_span.span.start == 0
            && answer_span.span.end == 0;

        let answer = if no_answer {
            None
        } else {
            let (byte_start, _) = offsets[answer_span.span.start];
            let (_, byte_end) = offsets[answer_span.span.end];
            Some(AnswerText {
                text: passage_text[byte_start..byte_end].to_string(),
                byte_start,
                byte_end,
            })
        };

        Ok(Prediction {
            answer_span,
            answer,
        })
    }
}
