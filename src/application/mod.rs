// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Turns a config file plus CLI flags into a finished training
// run. This layer only coordinates; the work happens in the
// data, ml and infra layers.
//
// Rules for this layer:
//   - No tensor math here
//   - No printing here (that's Layer 1)
//   - File access only through Layer 6

// Config file, CLI overrides, validation
pub mod config;

// The training workflow
pub mod train_use_case;
