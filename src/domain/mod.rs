// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe a training run without
// touching the tensor framework:
//
//   error.rs   — the categorised failure kinds of a run
//   record.rs  — per-batch stats, the per-epoch tally and the
//                metrics record emitted at the end of an epoch
//   traits.rs  — the reporting sinks the training loop writes to
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod error;

pub mod record;

pub mod traits;
