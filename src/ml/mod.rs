// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Everything that builds or updates a network lives here.
//
//   model.rs      — the detection model: Linear stack over the
//                   main model's representation
//
//   main_model.rs — main models: frozen feature extractors whose
//                   output the detection model classifies
//
//   registry.rs   — config name → model constructor
//
//   trainer.rs    — the training loop: forward, cross-entropy,
//                   backward, Adam step, accuracy, checkpoints
//                   and sink reporting per epoch
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Detection model architecture
pub mod model;

/// Frozen feature extractors
pub mod main_model;

/// Model name → constructor
pub mod registry;

/// Training loop with checkpointing and a single failure boundary
pub mod trainer;
