// ============================================================
// Layer 4 — Dataset
// ============================================================
// One training example: pre-tokenized passage and question plus
// the labelled answer span. The dataset wraps them for burn's
// DataLoader.

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::span::SpanLabel;

/// One labelled machine-comprehension example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidafSample {
    pub context_tokens: Vec<String>,
    pub question_tokens: Vec<String>,
    pub label: SpanLabel,
}

pub struct BidafDataset {
    samples: Vec<BidafSample>,
}

impl BidafDataset {
    pub fn new(samples: Vec<BidafSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<BidafSample> for BidafDataset {
    fn get(&self, index: usize) -> Option<BidafSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
