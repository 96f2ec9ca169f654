// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Assembles one training run from a loaded RunConfig, in order:
//
//   Step 1: Create the result directory   (Layer 6 - infra)
//   Step 2: Open the enabled sinks        (Layer 6 - infra)
//   Step 3: Build the dataset             (Layer 4 - data)
//   Step 4: Wrap it in a batch source     (Layer 4 - data)
//   Step 5: Select main + detection model (Layer 5 - ml)
//   Step 6: Run the training loop         (Layer 5 - ml)
//
// Failures in steps 1–2 have no sink to go to and are returned
// to the caller. From step 3 on, every failure is reported to
// the sinks and ends the run as RunOutcome::Failed.

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;

use crate::application::config::RunConfig;
use crate::data::{registry::DatasetRegistry, source::LoaderSource};
use crate::domain::{
    error::TrainResult,
    traits::{ExperimentTracker, RunLog},
};
use crate::infra::{
    checkpoint::CheckpointManager,
    results::ResultLayout,
    run_log::FileRunLog,
    sinks::Sinks,
    tracking::JsonlTracker,
};
use crate::ml::{
    registry::ModelRegistry,
    trainer::{RunOutcome, TrainSettings, Trainer},
};

// ─── Backend ──────────────────────────────────────────────────────────────────
#[cfg(not(feature = "wgpu"))]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray<f32>>;

#[cfg(feature = "wgpu")]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

pub struct TrainUseCase {
    config:   RunConfig,
    datasets: DatasetRegistry,
}

impl TrainUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self { config, datasets: DatasetRegistry::default() }
    }

    /// Use a custom dataset registry instead of the built-in one
    pub fn with_datasets(mut self, datasets: DatasetRegistry) -> Self {
        self.datasets = datasets;
        self
    }

    /// Run on the default backend
    pub fn execute(self) -> Result<RunOutcome> {
        self.execute_on::<TrainBackend>(Default::default())
    }

    pub fn execute_on<B: AutodiffBackend>(self, device: B::Device) -> Result<RunOutcome> {
        let Self { mut config, datasets } = self;

        // ── Step 1: Result directory + derived paths ──────────────────────────
        let layout = ResultLayout::prepare(&mut config)?;

        // ── Step 2: Sinks ─────────────────────────────────────────────────────
        let mut sinks = open_sinks(&config, &layout)?;
        tracing::info!(
            "Tracking {}, run log {}",
            if sinks.tracking_enabled() { "on" } else { "off" },
            if sinks.logging_enabled() { "on" } else { "off" }
        );

        // ── Steps 3–5: Assembly, inside the failure boundary ──────────────────
        let trainer = match assemble::<B>(&config, &datasets, &device) {
            Ok(trainer) => trainer,
            Err(err) => {
                tracing::error!("Could not set up training: {}", err);
                sinks.emit_alert(&err);
                return Ok(RunOutcome::Failed(err));
            }
        };

        // ── Step 6: Train ─────────────────────────────────────────────────────
        tracing::info!(
            "Training '{}' for {} epochs (checkpoint every {}, lr {})",
            config.run_name(),
            config.epochs,
            config.checkpoint_epoch,
            config.lr
        );
        Ok(trainer.run(&mut sinks))
    }
}

fn open_sinks(cfg: &RunConfig, layout: &ResultLayout) -> Result<Sinks> {
    let tracker: Option<Box<dyn ExperimentTracker>> = if cfg.wandb {
        Some(Box::new(JsonlTracker::init(layout.tracking_file(), &cfg.project, cfg)?))
    } else {
        None
    };
    let log: Option<Box<dyn RunLog>> = if cfg.log {
        Some(Box::new(FileRunLog::open(layout.run_log())?))
    } else {
        None
    };
    Ok(Sinks::new(tracker, log))
}

fn assemble<B: AutodiffBackend>(
    cfg:      &RunConfig,
    datasets: &DatasetRegistry,
    device:   &B::Device,
) -> TrainResult<Trainer<B>> {
    let dataset     = datasets.build(&cfg.dataset, cfg)?;
    let feature_dim = dataset.feature_dim();
    let num_classes = dataset.num_classes();

    let source = LoaderSource::<B>::new(
        dataset,
        cfg.batch_size,
        cfg.shuffle.then_some(cfg.seed),
        device.clone(),
    );

    let models     = ModelRegistry::<B>::default();
    let main_model = models.select_main(&cfg.main_model, cfg, feature_dim, device)?;
    let detection  = models.select_detection(
        &cfg.detection_model,
        cfg,
        main_model.output_dim(),
        num_classes,
        device,
    )?;

    Ok(Trainer::new(
        TrainSettings::from(cfg),
        Box::new(source),
        main_model,
        detection,
        CheckpointManager::from_config(cfg)?,
    ))
}
