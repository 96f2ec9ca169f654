// ============================================================
// Layer 4 — Detection Batcher
// ============================================================
// Implements Burn's Batcher trait to stack LabeledSamples into
// one input matrix and one label vector:
//
//   Input:  Vec of N samples, each with D features
//   Output: inputs [N, D] (float), labels [N] (int)
//
// Rows are already the same width (SampleDataset checks that),
// so the features are flattened and reshaped in one go.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::LabeledSample;

/// A batch ready for the main model's forward pass.
#[derive(Debug, Clone)]
pub struct LabeledBatch<B: Backend> {
    /// [batch_size, feature_dim]
    pub inputs: Tensor<B, 2>,

    /// [batch_size], class indices
    pub labels: Tensor<B, 1, Int>,
}

impl<B: Backend> LabeledBatch<B> {
    pub fn new(inputs: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> Self {
        Self { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
pub struct DetectionBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> DetectionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<LabeledSample, LabeledBatch<B>> for DetectionBatcher<B> {
    fn batch(&self, items: Vec<LabeledSample>) -> LabeledBatch<B> {
        let batch_size  = items.len();
        let feature_dim = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let inputs = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, feature_dim]),
            &self.device,
        );
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        LabeledBatch { inputs, labels }
    }
}
