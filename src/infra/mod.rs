// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of a run:
//
//   checkpoint.rs — checkpoint policy, best-accuracy tracker and
//                   the CompactRecorder-backed checkpoint writer
//   results.rs    — per-run directory layout and derived paths
//   tracking.rs   — file-backed experiment tracking session
//   run_log.rs    — human-readable results.log
//   sinks.rs      — the tracker + run log bundle handed to the
//                   training loop
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

pub mod checkpoint;

pub mod results;

pub mod tracking;

pub mod run_log;

pub mod sinks;
