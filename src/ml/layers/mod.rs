// ============================================================
// Layer 5 — Model Layers
// ============================================================
// The building blocks of the bidirectional attention flow
// pipeline, in the order data moves through them:
//
//   highway.rs    — gated per-position residual transform
//   similarity.rs — passage × question alignment scores
//   attention.rs  — context-to-query and query-to-context
//   merge.rs      — fused per-position feature vector (4H)
//   span_begin.rs — begin-position distribution
//   span_end.rs   — end-position distribution, conditioned on begin
//   combine.rs    — stacked [batch, 2, P] output
//
// Layers with learned weights are burn modules with their own
// configs; parameterless steps are plain tensor functions.

pub mod attention;
pub mod combine;
pub mod highway;
pub mod merge;
pub mod similarity;
pub mod span_begin;
pub mod span_end;
