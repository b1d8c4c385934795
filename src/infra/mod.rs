// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns used by several layers:
//
//   checkpoint.rs — per-component weight saving and restoring via
//                   burn's CompactRecorder, plus the architecture
//                   config needed to rebuild a model for inference
//
//   metrics.rs    — per-epoch training history appended to a CSV
//                   file for later analysis

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training history CSV logger
pub mod metrics;
