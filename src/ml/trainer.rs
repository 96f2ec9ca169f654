// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Supervised training of the detection model on top of a frozen
// main model, with Burn's autodiff and Adam.
//
// Per epoch:
//   batches ──► main model (detached) ──► detection model
//           ──► cross-entropy ──► backward ──► Adam step
//           ──► argmax accuracy into the epoch tally
//   then: metrics → tracker, line → run log,
//         periodic checkpoint, best-model checkpoint
//
// The whole run sits behind one failure boundary. Whatever goes
// wrong (data source, a model, the loss, a checkpoint write, a
// sink) is turned into a TrainError, reported to every enabled
// sink and ends the run. It is never re-raised. Burn reports
// shape and device errors by panicking, so each batch step also
// runs under catch_unwind.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use burn::{
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::config::RunConfig;
use crate::data::{batcher::LabeledBatch, source::BatchSource};
use crate::domain::{
    error::{TrainError, TrainResult},
    record::{BatchStats, EpochMetrics, EpochTally},
};
use crate::infra::{
    checkpoint::{BestTracker, CheckpointManager, CheckpointPolicy},
    sinks::Sinks,
};
use crate::ml::{main_model::FeatureExtractor, model::DetectionModel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainSettings {
    pub epochs:           usize,
    pub checkpoint_epoch: usize,
    pub lr:               f64,
}

impl From<&RunConfig> for TrainSettings {
    fn from(cfg: &RunConfig) -> Self {
        Self {
            epochs:           cfg.epochs,
            checkpoint_epoch: cfg.checkpoint_epoch,
            lr:               cfg.lr,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub best_accuracy: f64,
    pub history:       Vec<EpochMetrics>,
}

/// How a run ended. A failure has already been reported to the
/// sinks by the time the caller sees it.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    Failed(TrainError),
}

pub struct Trainer<B: AutodiffBackend> {
    settings:    TrainSettings,
    source:      Box<dyn BatchSource<B>>,
    main_model:  Box<dyn FeatureExtractor<B>>,
    detection:   DetectionModel<B>,
    checkpoints: CheckpointManager,
}

impl<B: AutodiffBackend> Trainer<B> {
    pub fn new(
        settings:    TrainSettings,
        source:      Box<dyn BatchSource<B>>,
        main_model:  Box<dyn FeatureExtractor<B>>,
        detection:   DetectionModel<B>,
        checkpoints: CheckpointManager,
    ) -> Self {
        Self { settings, source, main_model, detection, checkpoints }
    }

    /// Run every epoch. Never panics on a training failure and
    /// never returns it as an Err: failures go to the sinks.
    pub fn run(self, sinks: &mut Sinks) -> RunOutcome {
        match self.train(sinks) {
            Ok(summary) => {
                tracing::info!(
                    "Training complete: {} epochs, best accuracy {:.2}%",
                    summary.history.len(),
                    summary.best_accuracy
                );
                RunOutcome::Completed(summary)
            }
            Err(err) => {
                tracing::error!("Training stopped: {}", err);
                sinks.emit_alert(&err);
                RunOutcome::Failed(err)
            }
        }
    }

    fn train(self, sinks: &mut Sinks) -> TrainResult<RunSummary> {
        let Self { settings, source, main_model, mut detection, checkpoints } = self;
        if settings.epochs == 0 {
            return Err(TrainError::config("epochs must be a positive integer"));
        }

        let policy    = CheckpointPolicy::new(settings.checkpoint_epoch)?;
        let mut best  = BestTracker::new();
        let mut optim = AdamConfig::new().init::<B, DetectionModel<B>>();
        let mut history = Vec::with_capacity(settings.epochs);

        for epoch in 0..settings.epochs {
            let mut tally = EpochTally::new();

            for batch in source.batches() {
                let batch = batch.map_err(|e| TrainError::data_source(&e))?;
                let (next, stats) =
                    guarded_step(detection, &mut optim, main_model.as_ref(), batch, settings.lr)?;
                detection = next;
                tally.record(stats)?;
            }
            tracing::debug!("Epoch {}: {}/{} correct", epoch, tally.correct(), tally.total());

            let metrics = tally.finish(epoch)?;

            sinks.emit_metric(&metrics)?;
            sinks.emit_log_line(&metrics.to_string())?;

            if policy.periodic_due(epoch) {
                checkpoints.save_periodic(&detection, epoch)?;
            }
            if best.observe(metrics.accuracy) {
                checkpoints.save_best(&detection)?;
                tracing::info!("New best accuracy {:.2}% at epoch {}", metrics.accuracy, epoch);
            }

            history.push(metrics);
        }

        let best_accuracy = best.best().unwrap_or_default();
        sinks.close()?;
        sinks.emit_log_line(&format!("Best accuracy: {best_accuracy:.2}%"))?;

        Ok(RunSummary { best_accuracy, history })
    }
}

/// One optimisation step with backend panics turned into errors
fn guarded_step<B, O>(
    model:      DetectionModel<B>,
    optim:      &mut O,
    main_model: &dyn FeatureExtractor<B>,
    batch:      LabeledBatch<B>,
    lr:         f64,
) -> TrainResult<(DetectionModel<B>, BatchStats)>
where
    B: AutodiffBackend,
    O: Optimizer<DetectionModel<B>, B>,
{
    panic::catch_unwind(AssertUnwindSafe(|| train_step(model, optim, main_model, batch, lr)))
        .unwrap_or_else(|payload| Err(TrainError::compute(panic_message(payload.as_ref()))))
}

fn train_step<B, O>(
    model:      DetectionModel<B>,
    optim:      &mut O,
    main_model: &dyn FeatureExtractor<B>,
    batch:      LabeledBatch<B>,
    lr:         f64,
) -> TrainResult<(DetectionModel<B>, BatchStats)>
where
    B: AutodiffBackend,
    O: Optimizer<DetectionModel<B>, B>,
{
    if batch.is_empty() {
        return Err(TrainError::DataSource("received an empty batch".into()));
    }
    let LabeledBatch { inputs, labels } = batch;
    let batch_size = labels.dims()[0];
    let rows       = inputs.dims()[0];
    if rows != batch_size {
        return Err(TrainError::DataSource(format!(
            "batch has {rows} inputs but {batch_size} labels"
        )));
    }

    // ── Forward ───────────────────────────────────────────────────────────────
    // Gradients are not accumulated across steps: every backward()
    // returns a fresh set, so there is nothing to zero first.
    let state = main_model.represent(inputs);
    let width = state.dims()[1];
    if width != model.input_dim() {
        return Err(TrainError::compute(format!(
            "main model '{}' produced {width}-wide representations, detection model expects {}",
            main_model.name(),
            model.input_dim()
        )));
    }
    let output = model.forward(state);

    let loss = CrossEntropyLossConfig::new()
        .init(&output.device())
        .forward(output.clone(), labels.clone());
    let loss_value: f64 = loss.clone().into_scalar().elem::<f64>();

    // ── Backward + Adam update (detection parameters only) ────────────────────
    let grads = GradientsParams::from_grads(loss.backward(), &model);
    let model = optim.step(lr, model, grads);

    // argmax(1) keeps the reduced dim: [batch, 1] → [batch]
    let predicted = output.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    Ok((model, BatchStats { batch_size, correct: correct as usize, loss: loss_value }))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("backend panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("backend panicked: {s}")
    } else {
        "backend panicked".to_string()
    }
}
