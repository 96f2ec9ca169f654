use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::error::{TrainError, TrainResult};

/// One input vector with its integer class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: Vec<f32>,
    pub label:    usize,
}

/// In-memory labelled samples. Every row has the same width.
pub struct SampleDataset {
    samples:     Vec<LabeledSample>,
    feature_dim: usize,
    num_classes: usize,
}

impl SampleDataset {
    /// `min_classes` lets a config declare classes that happen to be
    /// absent from this file; the class count is never smaller than
    /// `max(label) + 1`.
    pub fn new(samples: Vec<LabeledSample>, min_classes: usize) -> TrainResult<Self> {
        let first = samples
            .first()
            .ok_or_else(|| TrainError::config("dataset is empty"))?;
        let feature_dim = first.features.len();
        if feature_dim == 0 {
            return Err(TrainError::config("samples have no features"));
        }
        if let Some((i, s)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.features.len() != feature_dim)
        {
            return Err(TrainError::config(format!(
                "sample {i} has {} features, expected {feature_dim}",
                s.features.len()
            )));
        }

        let max_label   = samples.iter().map(|s| s.label).max().unwrap_or(0);
        let num_classes = (max_label + 1).max(min_classes);
        if num_classes < 2 {
            return Err(TrainError::config("at least two classes are required"));
        }

        Ok(Self { samples, feature_dim, num_classes })
    }

    pub fn feature_dim(&self) -> usize { self.feature_dim }

    pub fn num_classes(&self) -> usize { self.num_classes }
}

impl Dataset<LabeledSample> for SampleDataset {
    fn get(&self, index: usize) -> Option<LabeledSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(features: &[f32], label: usize) -> LabeledSample {
        LabeledSample { features: features.to_vec(), label }
    }

    #[test]
    fn test_shape_and_classes() {
        let ds = SampleDataset::new(vec![sample(&[0.0, 1.0], 0), sample(&[1.0, 0.0], 2)], 2).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.feature_dim(), 2);
        assert_eq!(ds.num_classes(), 3);
        assert_eq!(ds.get(1).unwrap().label, 2);
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_declared_classes_win_when_larger() {
        let ds = SampleDataset::new(vec![sample(&[0.0], 0), sample(&[1.0], 1)], 5).unwrap();
        assert_eq!(ds.num_classes(), 5);
    }

    #[test]
    fn test_rejects_empty_and_ragged() {
        assert!(SampleDataset::new(Vec::new(), 2).is_err());
        let err = SampleDataset::new(vec![sample(&[0.0, 1.0], 0), sample(&[1.0], 1)], 2)
            .err()
            .unwrap();
        assert!(err.to_string().contains("sample 1"));
    }
}
