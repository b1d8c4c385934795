// ============================================================
// Layer 5 — Bidirectional Attention Flow Model
// ============================================================
// Composes the layers into the full pipeline:
//
//   passage ─┐
//            ├─ highway ×N ─ shared BiLSTM encoder
//   question ┘                      │
//        similarity ── c2q / q2c attention ── merge (4H)
//                                              │
//                      modeling BiLSTM ×M ─────┤
//                                              │
//                span begin ──► span end ── combine [batch, 2, P]
//
// Every weighted component owns its parameters as a module field;
// the composite aggregates them by composition, which is also what
// lets the checkpoint manager persist each component on its own.

use burn::nn::{BiLstm, BiLstmConfig, Dropout, DropoutConfig};
use burn::prelude::*;
use thiserror::Error;

use crate::ml::layers::{
    attention, combine,
    highway::{Highway, HighwayConfig},
    merge,
    similarity::{Similarity, SimilarityConfig},
    span_begin::{SpanBegin, SpanBeginConfig},
    span_end::{SpanEnd, SpanEndConfig},
};
use crate::ml::loss;

/// Construction-time and forward-time failures of the architecture.
///
/// Shape problems reject the graph instead of producing undefined
/// tensors downstream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("embedding dimension must be at least 1")]
    ZeroEmbeddingDim,

    #[error("at least one modeling layer is required")]
    NoModelingLayers,

    #[error("{side} batch has no token positions")]
    EmptySequence { side: &'static str },

    #[error("{side} embedding width is {actual}, model expects {expected}")]
    EmbeddingWidthMismatch {
        side: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Config, Debug)]
pub struct BidafConfig {
    /// Embedding dimension E of the input token vectors
    pub emdim: usize,

    /// Stacked highway layers applied to both sequences
    #[config(default = 2)]
    pub num_highway_layers: usize,

    /// Stacked modeling encoders refining the merged context
    #[config(default = 1)]
    pub num_modeling_layers: usize,

    /// Dropout on the encoder inputs during training
    #[config(default = 0.0)]
    pub encoder_dropout: f64,

    /// Dropout between modeling encoders during training
    #[config(default = 0.0)]
    pub decoder_dropout: f64,
}

impl BidafConfig {
    /// Build the model, rejecting degenerate architectures up front.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Bidaf<B>, ModelError> {
        if self.emdim == 0 {
            return Err(ModelError::ZeroEmbeddingDim);
        }
        if self.num_modeling_layers == 0 {
            return Err(ModelError::NoModelingLayers);
        }

        let e = self.emdim;

        let highway = (0..self.num_highway_layers)
            .map(|_| HighwayConfig::new(e).init(device))
            .collect();

        // One encoder shared by passage and question; output width 2E.
        let encoder = BiLstmConfig::new(e, e, true).init(device);

        let similarity = SimilarityConfig::new(2 * e).init(device);

        // The first modeling layer consumes the merged context (8E),
        // subsequent ones consume the previous layer's output (2E).
        let modeling = (0..self.num_modeling_layers)
            .map(|i| {
                let d_input = if i == 0 { 8 * e } else { 2 * e };
                BiLstmConfig::new(d_input, e, true).init(device)
            })
            .collect();

        let span_begin = SpanBeginConfig::new(8 * e, 2 * e).init(device);
        let span_end = SpanEndConfig::new(e).init(device);

        Ok(Bidaf {
            highway,
            encoder,
            similarity,
            modeling,
            span_begin,
            span_end,
            encoder_dropout: DropoutConfig::new(self.encoder_dropout).init(),
            decoder_dropout: DropoutConfig::new(self.decoder_dropout).init(),
            emdim: e,
        })
    }
}

#[derive(Module, Debug)]
pub struct Bidaf<B: Backend> {
    pub highway: Vec<Highway<B>>,
    pub encoder: BiLstm<B>,
    pub similarity: Similarity<B>,
    pub modeling: Vec<BiLstm<B>>,
    pub span_begin: SpanBegin<B>,
    pub span_end: SpanEnd<B>,
    pub encoder_dropout: Dropout,
    pub decoder_dropout: Dropout,
    pub emdim: usize,
}

/// The combined output: begin distribution at index 0 of the middle
/// axis, end distribution at index 1.
#[derive(Debug, Clone)]
pub struct BidafOutput<B: Backend> {
    /// Shape [batch, 2, P]
    pub combined: Tensor<B, 3>,
}

impl<B: Backend> BidafOutput<B> {
    /// Begin distribution, shape [batch, P]
    pub fn begin(&self) -> Tensor<B, 2> {
        let [batch, _, p] = self.combined.dims();
        self.combined.clone().slice([0..batch, 0..1, 0..p]).squeeze(1)
    }

    /// End distribution, shape [batch, P]
    pub fn end(&self) -> Tensor<B, 2> {
        let [batch, _, p] = self.combined.dims();
        self.combined.clone().slice([0..batch, 1..2, 0..p]).squeeze(1)
    }
}

impl<B: Backend> Bidaf<B> {
    /// Full forward pass.
    ///
    /// passage: [batch, P, E], question: [batch, Q, E]
    /// -> combined [batch, 2, P]
    pub fn forward(
        &self,
        passage: Tensor<B, 3>,
        question: Tensor<B, 3>,
    ) -> Result<BidafOutput<B>, ModelError> {
        self.check_input("passage", &passage)?;
        self.check_input("question", &question)?;

        // Shared highway stack, applied position-wise to both sides.
        let mut passage_emb = passage;
        let mut question_emb = question;
        for layer in &self.highway {
            passage_emb = layer.forward(passage_emb);
            question_emb = layer.forward(question_emb);
        }

        // Shared bidirectional encoder; width doubles to 2E.
        let (encoded_passage, _) = self
            .encoder
            .forward(self.encoder_dropout.forward(passage_emb), None);
        let (encoded_question, _) = self
            .encoder
            .forward(self.encoder_dropout.forward(question_emb), None);

        let similarity = self
            .similarity
            .forward(encoded_passage.clone(), encoded_question.clone());

        let c2q = attention::context_to_query(similarity.clone(), encoded_question);
        let q2c = attention::query_to_context(similarity, encoded_passage.clone());

        let merged = merge::merged_context(encoded_passage, c2q, q2c);

        let mut modeled = merged.clone();
        for (i, layer) in self.modeling.iter().enumerate() {
            if i > 0 {
                modeled = self.decoder_dropout.forward(modeled);
            }
            modeled = layer.forward(modeled, None).0;
        }

        let begin = self.span_begin.forward(merged.clone(), modeled.clone());
        let end = self.span_end.forward(merged, modeled, begin.clone());

        Ok(BidafOutput {
            combined: combine::combine_outputs(begin, end),
        })
    }

    /// Forward pass plus training loss against ground-truth labels.
    ///
    /// starts, ends: [batch] inclusive token indices into the passage
    pub fn forward_loss(
        &self,
        passage: Tensor<B, 3>,
        question: Tensor<B, 3>,
        starts: Tensor<B, 1, Int>,
        ends: Tensor<B, 1, Int>,
    ) -> Result<(Tensor<B, 1>, BidafOutput<B>), ModelError> {
        let output = self.forward(passage, question)?;
        let loss = loss::negative_avg_log_error(&output, starts, ends);
        Ok((loss, output))
    }

    fn check_input(&self, side: &'static str, input: &Tensor<B, 3>) -> Result<(), ModelError> {
        let [_, tokens, width] = input.dims();
        if tokens == 0 {
            return Err(ModelError::EmptySequence { side });
        }
        if width != self.emdim {
            return Err(ModelError::EmbeddingWidthMismatch {
                side,
                expected: self.emdim,
                actual: width,
            });
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    type TestBackend = burn::backend::NdArray;

    fn small_model(device: &<TestBackend as Backend>::Device) -> Bidaf<TestBackend> {
        BidafConfig::new(3).init(device).unwrap()
    }

    #[test]
    fn test_config_rejects_zero_emdim() {
        let device = Default::default();
        let err = BidafConfig::new(0).init::<TestBackend>(&device).unwrap_err();
        assert_eq!(err, ModelError::ZeroEmbeddingDim);
    }

    #[test]
    fn test_config_rejects_zero_modeling_layers() {
        let device = Default::default();
        let err = BidafConfig::new(3)
            .with_num_modeling_layers(0)
            .init::<TestBackend>(&device)
            .unwrap_err();
        assert_eq!(err, ModelError::NoModelingLayers);
    }

    #[test]
    fn test_forward_rejects_empty_sequences() {
        let device = Default::default();
        let model = small_model(&device);

        let passage = Tensor::<TestBackend, 3>::zeros([1, 0, 3], &device);
        let question = Tensor::<TestBackend, 3>::zeros([1, 4, 3], &device);

        let err = model.forward(passage, question).unwrap_err();
        assert_eq!(err, ModelError::EmptySequence { side: "passage" });
    }

    #[test]
    fn test_forward_rejects_width_mismatch() {
        let device = Default::default();
        let model = small_model(&device);

        let passage = Tensor::<TestBackend, 3>::zeros([1, 5, 4], &device);
        let question = Tensor::<TestBackend, 3>::zeros([1, 4, 3], &device);

        let err = model.forward(passage, question).unwrap_err();
        assert_eq!(
            err,
            ModelError::EmbeddingWidthMismatch {
                side: "passage",
                expected: 3,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_forward_output_shape_and_normalization() {
        let device = Default::default();
        let model = small_model(&device);

        let passage = Tensor::<TestBackend, 3>::random(
            [2, 7, 3],
            burn::tensor::Distribution::Default,
            &device,
        );
        let question = Tensor::<TestBackend, 3>::random(
            [2, 4, 3],
            burn::tensor::Distribution::Default,
            &device,
        );

        let output = model.forward(passage, question).unwrap();
        assert_eq!(output.combined.dims(), [2, 2, 7]);

        // Both distributions sum to 1 with no negative entries.
        for dist in [output.begin(), output.end()] {
            let data = dist.into_data().to_vec::<f32>().unwrap();
            for row in data.chunks(7) {
                let sum: f32 = row.iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-4);
                assert!(row.iter().all(|&p| p >= 0.0));
            }
        }
    }

    #[test]
    fn test_begin_end_accessors_match_combined() {
        let device = Default::default();
        let model = small_model(&device);

        let passage = Tensor::<TestBackend, 3>::random(
            [1, 5, 3],
            burn::tensor::Distribution::Default,
            &device,
        );
        let question = Tensor::<TestBackend, 3>::random(
            [1, 3, 3],
            burn::tensor::Distribution::Default,
            &device,
        );

        let output = model.forward(passage, question).unwrap();
        let combined = output.combined.clone().into_data().to_vec::<f32>().unwrap();
        let begin = output.begin().into_data().to_vec::<f32>().unwrap();
        let end = output.end().into_data().to_vec::<f32>().unwrap();

        assert_eq!(&combined[..5], begin.as_slice());
        assert_eq!(&combined[5..], end.as_slice());
    }
}
