// ============================================================
// Layer 4 — Data Layer
// ============================================================
// Everything between raw files and model-ready tensors:
//
//   embeddings.rs — GloVe-format word vectors (EmbeddingProvider)
//   tokenize.rs   — word tokenization with byte offsets for the
//                   predict path
//   loader.rs     — parallel-file dataset splits with validation
//   dataset.rs    — burn Dataset over labelled samples
//   batcher.rs    — per-batch embedding, padding and tensor
//                   construction

/// Pre-trained word vectors
pub mod embeddings;

/// Word tokenization with offsets
pub mod tokenize;

/// Dataset split loading and validation
pub mod loader;

/// Labelled samples and the burn Dataset impl
pub mod dataset;

/// Sample-to-tensor batching
pub mod batcher;
