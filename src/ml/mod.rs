// ============================================================
// Layer 5 — Machine Learning Layer
// ============================================================
// The model core and everything that runs it:
//
//   layers/       — the attention-flow building blocks
//   model.rs      — the composed architecture and its config
//   loss.rs       — negative-avg-log loss and the accuracy metric
//   decoder.rs    — inference-time best-span search
//   trainer.rs    — train + validation loop on the wgpu backend
//   inferencer.rs — checkpoint loading and single-example prediction

/// Attention-flow building blocks
pub mod layers;

/// The composed model
pub mod model;

/// Training loss and accuracy metric
pub mod loss;

/// Best-span search
pub mod decoder;

/// Training loop
pub mod trainer;

/// Prediction on a loaded checkpoint
pub mod inferencer;
