// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// The vocabulary of the problem, free of tensor and I/O types:
//
//   span.rs   — Span, AnswerSpan, SpanLabel and their invariants
//   answer.rs — Prediction and materialized answer text
//   traits.rs — the seams to collaborators (embedding lookup,
//               question answering)
//
// Nothing in this layer depends on burn, clap, or the filesystem,
// so every other layer can depend on it without cycles.

/// Span types and label validation
pub mod span;

/// Prediction result types
pub mod answer;

/// Collaborator trait seams
pub mod traits;
