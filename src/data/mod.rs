// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From a dataset name in the config to tensor batches:
//
//   DatasetRegistry   → picks a constructor by name
//       │
//       ▼
//   loader            → reads JSONL / generates clusters
//       │
//       ▼
//   SampleDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   DetectionBatcher  → stacks samples into tensor batches
//       │
//       ▼
//   LoaderSource      → Burn DataLoader behind the BatchSource
//                       trait the training loop consumes
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Labelled samples and Burn's Dataset trait
pub mod dataset;

/// Burn Batcher producing LabeledBatch tensors
pub mod batcher;

/// JSONL and synthetic sample loaders
pub mod loader;

/// BatchSource trait and the DataLoader-backed source
pub mod source;

/// Dataset name → constructor
pub mod registry;
