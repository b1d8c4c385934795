// ============================================================
// Layer 2 — Application Layer
// ============================================================
// Use cases that orchestrate the lower layers end to end. The CLI
// calls into this layer and nothing below it ever sees clap types.
//
//   train_use_case.rs   — data → model → training loop → checkpoints
//   predict_use_case.rs — checkpoint → tokenize → predict → answer

/// Training pipeline orchestration
pub mod train_use_case;

/// Prediction pipeline orchestration
pub mod predict_use_case;
