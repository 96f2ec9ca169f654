// ============================================================
// Layer 4 — Batch Sources
// ============================================================
// What the training loop pulls batches from. The loop consumes
// batches in exactly the order the source yields them; any
// shuffling is the source's business.
//
// A source may fail part-way through an epoch, so each item is a
// Result. The loader-backed source never fails once built, but
// other sources (streamed shards, remote stores) can.

use std::sync::Arc;

use anyhow::Result;
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::data::{
    batcher::{DetectionBatcher, LabeledBatch},
    dataset::SampleDataset,
};

pub trait BatchSource<B: Backend> {
    /// One epoch's worth of batches. Called once per epoch.
    fn batches(&self) -> Box<dyn Iterator<Item = Result<LabeledBatch<B>>> + '_>;
}

/// Burn DataLoader over an in-memory SampleDataset.
pub struct LoaderSource<B: Backend> {
    loader: Arc<dyn DataLoader<LabeledBatch<B>>>,
}

impl<B: Backend> LoaderSource<B> {
    /// `shuffle_seed = Some(seed)` reshuffles every epoch from
    /// a seeded generator; `None` keeps dataset order.
    pub fn new(
        dataset:      SampleDataset,
        batch_size:   usize,
        shuffle_seed: Option<u64>,
        device:       B::Device,
    ) -> Self {
        let batcher     = DetectionBatcher::<B>::new(device);
        let mut builder = DataLoaderBuilder::new(batcher).batch_size(batch_size.max(1));
        if let Some(seed) = shuffle_seed {
            builder = builder.shuffle(seed);
        }
        // Single-threaded loader: batches arrive in dataset order
        Self { loader: builder.build(dataset) }
    }

    pub fn num_items(&self) -> usize {
        self.loader.num_items()
    }
}

impl<B: Backend> BatchSource<B> for LoaderSource<B> {
    fn batches(&self) -> Box<dyn Iterator<Item = Result<LabeledBatch<B>>> + '_> {
        Box::new(self.loader.iter().map(Ok::<_, anyhow::Error>))
    }
}
