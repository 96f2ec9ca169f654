// ============================================================
// Layer 6 — Checkpoint Policy & Manager
// ============================================================
// Two kinds of checkpoint are written during a run, both
// holding only the detection model's parameters:
//
//   periodic — one file per checkpoint interval, named by the
//              epoch index, never overwritten within a run
//   best     — a single file, overwritten whenever a strictly
//              better epoch accuracy is seen
//
// File naming convention:
//   <run>/
//     det_model_weights/
//       epoch_0.mpk   ← epoch 0 always matches 0 % interval
//       epoch_5.mpk
//       ...
//     best_model.mpk
//
// Burn's CompactRecorder serialises the record to half-precision
// MessagePack and always sets its own extension on the path it is
// given. Paths handed out by the manager (and stored in the
// config) already carry that extension; only the bare stem is
// passed to the recorder.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder},
};

use crate::application::config::RunConfig;
use crate::domain::error::{TrainError, TrainResult};
use crate::ml::model::DetectionModel;

/// Extension CompactRecorder writes. Used where no backend type
/// is at hand, e.g. when the result layout derives config paths.
pub const CHECKPOINT_EXTENSION: &str = "mpk";

// ─── CheckpointPolicy ─────────────────────────────────────────────────────────
/// Decides which epochs get a periodic checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct CheckpointPolicy {
    interval: usize,
}

impl CheckpointPolicy {
    pub fn new(interval: usize) -> TrainResult<Self> {
        if interval == 0 {
            return Err(TrainError::config("checkpoint_epoch must be a positive integer"));
        }
        Ok(Self { interval })
    }

    pub fn periodic_due(&self, epoch: usize) -> bool {
        epoch % self.interval == 0
    }
}

// ─── BestTracker ──────────────────────────────────────────────────────────────
/// Best epoch accuracy seen so far in a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct BestTracker {
    best: Option<f64>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the best-model checkpoint must be rewritten:
    /// always for the first epoch, afterwards only on a strict
    /// improvement. Ties keep the earlier checkpoint.
    pub fn observe(&mut self, accuracy: f64) -> bool {
        match self.best {
            Some(best) if accuracy <= best => false,
            _ => {
                self.best = Some(accuracy);
                true
            }
        }
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }
}

// ─── CheckpointManager ────────────────────────────────────────────────────────
pub struct CheckpointManager {
    /// Directory for periodic checkpoints
    model_dir: PathBuf,

    /// Best-model checkpoint file
    best_path: PathBuf,
}

impl CheckpointManager {
    pub fn new(model_dir: impl Into<PathBuf>, best_path: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            best_path: best_path.into(),
        }
    }

    /// Build from the two derived paths. Both must have been
    /// populated by the result layout before training starts.
    pub fn from_config(cfg: &RunConfig) -> TrainResult<Self> {
        let model_dir = cfg.model_path.clone().ok_or_else(|| {
            TrainError::config("model_path is not set; prepare the result layout first")
        })?;
        let best_path = cfg.best_model_path.clone().ok_or_else(|| {
            TrainError::config("best_model_path is not set; prepare the result layout first")
        })?;
        Ok(Self::new(model_dir, best_path))
    }

    /// On-disk path of the periodic checkpoint for `epoch`
    pub fn periodic_path<B: Backend>(&self, epoch: usize) -> PathBuf {
        with_recorder_extension::<B>(&self.model_dir.join(format!("epoch_{epoch}")))
    }

    /// On-disk path of the best-model checkpoint
    pub fn best_path<B: Backend>(&self) -> PathBuf {
        with_recorder_extension::<B>(&self.best_path)
    }

    pub fn save_periodic<B: Backend>(
        &self,
        model: &DetectionModel<B>,
        epoch: usize,
    ) -> TrainResult<PathBuf> {
        let path = self.periodic_path::<B>(epoch);
        save(model, &path)?;
        tracing::debug!("Saved periodic checkpoint for epoch {}: {}", epoch, path.display());
        Ok(path)
    }

    pub fn save_best<B: Backend>(&self, model: &DetectionModel<B>) -> TrainResult<PathBuf> {
        let path = self.best_path::<B>();
        save(model, &path)?;
        tracing::debug!("Saved best-model checkpoint: {}", path.display());
        Ok(path)
    }
}

fn save<B: Backend>(model: &DetectionModel<B>, path: &Path) -> TrainResult<()> {
    model
        .clone()
        .save_file(path.with_extension(""), &CompactRecorder::new())
        .map_err(|err| TrainError::Persistence {
            path:    path.to_path_buf(),
            message: err.to_string(),
        })
}

fn with_recorder_extension<B: Backend>(path: &Path) -> PathBuf {
    path.with_extension(<CompactRecorder as FileRecorder<B>>::file_extension())
}
