// ============================================================
// Layer 4 — Dataset Registry
// ============================================================
// Maps the `dataset` config string to a constructor. Lookup is
// case-insensitive, so "Synthetic" and "synthetic" are the same.
//
//   synthetic — seeded Gaussian clusters
//               (num_samples, feature_dim, num_classes, seed)
//   jsonl     — samples read from `data_path`

use std::collections::BTreeMap;

use anyhow::Result;

use crate::application::config::RunConfig;
use crate::data::{
    dataset::SampleDataset,
    loader::{load_jsonl, synthetic_clusters},
};
use crate::domain::error::{TrainError, TrainResult};

pub type DatasetCtor = fn(&RunConfig) -> Result<SampleDataset>;

pub struct DatasetRegistry {
    entries: BTreeMap<String, DatasetCtor>,
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        let mut registry = Self { entries: BTreeMap::new() };
        registry.register("synthetic", build_synthetic);
        registry.register("jsonl", build_jsonl);
        registry
    }
}

impl DatasetRegistry {
    pub fn register(&mut self, name: &str, ctor: DatasetCtor) {
        self.entries.insert(name.to_ascii_lowercase(), ctor);
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn build(&self, name: &str, cfg: &RunConfig) -> TrainResult<SampleDataset> {
        let ctor = self.entries.get(&name.to_ascii_lowercase()).ok_or_else(|| {
            TrainError::config(format!(
                "unknown dataset '{name}' (available: {})",
                self.names().join(", ")
            ))
        })?;
        let dataset = ctor(cfg).map_err(|e| TrainError::data_source(&e.context(format!("dataset '{name}'"))))?;
        tracing::info!(
            "Dataset '{}': {} samples, {} features, {} classes",
            name,
            burn::data::dataset::Dataset::len(&dataset),
            dataset.feature_dim(),
            dataset.num_classes()
        );
        Ok(dataset)
    }
}

fn build_synthetic(cfg: &RunConfig) -> Result<SampleDataset> {
    let samples = synthetic_clusters(cfg.num_samples, cfg.feature_dim, cfg.num_classes, cfg.seed);
    Ok(SampleDataset::new(samples, cfg.num_classes)?)
}

fn build_jsonl(cfg: &RunConfig) -> Result<SampleDataset> {
    let path = cfg
        .data_path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("data_path is required for the jsonl dataset"))?;
    Ok(SampleDataset::new(load_jsonl(path)?, cfg.num_classes)?)
}
