// ============================================================
// Layer 5 — Model Registry
// ============================================================
// Resolves the `main_model` and `detection_model` config strings
// once, during assembly. The training loop only ever sees the
// resulting objects.
//
//   main models:      identity, projection
//   detection models: linear, mlp
//
// Lookup is case-insensitive ("MLP" == "mlp").

use std::collections::BTreeMap;

use burn::prelude::*;

use crate::application::config::RunConfig;
use crate::domain::error::{TrainError, TrainResult};
use crate::ml::{
    main_model::{FeatureExtractor, IdentityExtractor, ProjectionExtractor},
    model::{DetectionModel, DetectionModelConfig},
};

/// (config, representation width, number of classes) → architecture
pub type DetectionCtor = fn(&RunConfig, usize, usize) -> DetectionModelConfig;

/// (config, input width, device) → frozen feature extractor
pub type MainCtor<B> = fn(&RunConfig, usize, &<B as Backend>::Device) -> Box<dyn FeatureExtractor<B>>;

pub struct ModelRegistry<B: Backend> {
    detection: BTreeMap<String, DetectionCtor>,
    main:      BTreeMap<String, MainCtor<B>>,
}

impl<B: Backend> Default for ModelRegistry<B> {
    fn default() -> Self {
        let mut registry = Self {
            detection: BTreeMap::new(),
            main:      BTreeMap::new(),
        };
        registry.register_detection("linear", linear_detector);
        registry.register_detection("mlp", mlp_detector);
        registry.register_main("identity", identity_main::<B>);
        registry.register_main("projection", projection_main::<B>);
        registry
    }
}

impl<B: Backend> ModelRegistry<B> {
    pub fn register_detection(&mut self, name: &str, ctor: DetectionCtor) {
        self.detection.insert(name.to_ascii_lowercase(), ctor);
    }

    pub fn register_main(&mut self, name: &str, ctor: MainCtor<B>) {
        self.main.insert(name.to_ascii_lowercase(), ctor);
    }

    pub fn select_main(
        &self,
        name:      &str,
        cfg:       &RunConfig,
        input_dim: usize,
        device:    &B::Device,
    ) -> TrainResult<Box<dyn FeatureExtractor<B>>> {
        let ctor = lookup(&self.main, "main model", name)?;
        let extractor = ctor(cfg, input_dim, device);
        tracing::info!(
            "Main model '{}': {} → {} features",
            extractor.name(),
            input_dim,
            extractor.output_dim()
        );
        Ok(extractor)
    }

    pub fn select_detection(
        &self,
        name:        &str,
        cfg:         &RunConfig,
        input_dim:   usize,
        num_classes: usize,
        device:      &B::Device,
    ) -> TrainResult<DetectionModel<B>> {
        let ctor      = lookup(&self.detection, "detection model", name)?;
        let model_cfg = ctor(cfg, input_dim, num_classes);
        tracing::info!(
            "Detection model '{}': {} → {:?} → {} classes",
            name,
            model_cfg.input_dim,
            model_cfg.hidden,
            model_cfg.num_classes
        );
        Ok(model_cfg.init(device))
    }
}

fn lookup<'a, T>(entries: &'a BTreeMap<String, T>, what: &str, name: &str) -> TrainResult<&'a T> {
    entries.get(&name.to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = entries.keys().map(String::as_str).collect();
        TrainError::config(format!("unknown {what} '{name}' (available: {})", known.join(", ")))
    })
}

fn linear_detector(cfg: &RunConfig, input_dim: usize, num_classes: usize) -> DetectionModelConfig {
    DetectionModelConfig::new(input_dim, Vec::new(), num_classes, cfg.dropout)
}

fn mlp_detector(cfg: &RunConfig, input_dim: usize, num_classes: usize) -> DetectionModelConfig {
    DetectionModelConfig::new(input_dim, vec![cfg.hidden_dim], num_classes, cfg.dropout)
}

fn identity_main<B: Backend>(
    _cfg:      &RunConfig,
    input_dim: usize,
    _device:   &B::Device,
) -> Box<dyn FeatureExtractor<B>> {
    Box::new(IdentityExtractor::new(input_dim))
}

fn projection_main<B: Backend>(
    cfg:       &RunConfig,
    input_dim: usize,
    device:    &B::Device,
) -> Box<dyn FeatureExtractor<B>> {
    Box::new(ProjectionExtractor::<B>::new(input_dim, cfg.representation_dim, cfg.seed, device))
}
