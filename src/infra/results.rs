// ============================================================
// Layer 6 — Result Layout
// ============================================================
// Creates the per-run directory and fills in the two derived
// config paths the training loop depends on.
//
//   <result_path>/<detection>_<main>_<dataset>_<tag>/
//     config.json           ← full config incl. derived paths
//     results.log           ← run log (when `log` is on)
//     tracking.jsonl        ← tracker events (when `wandb` is on)
//     best_model.mpk        ← best-model checkpoint
//     det_model_weights/    ← periodic checkpoints

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::config::RunConfig;
use crate::infra::checkpoint::CHECKPOINT_EXTENSION;

pub const WEIGHTS_DIR:   &str = "det_model_weights";
pub const BEST_MODEL:    &str = "best_model";
pub const RUN_LOG:       &str = "results.log";
pub const TRACKING_FILE: &str = "tracking.jsonl";
pub const CONFIG_COPY:   &str = "config.json";

#[derive(Debug, Clone)]
pub struct ResultLayout {
    run_dir: PathBuf,
}

impl ResultLayout {
    /// Create the run directories, populate `model_path` and
    /// `best_model_path` on the config and save a copy of it.
    pub fn prepare(cfg: &mut RunConfig) -> Result<Self> {
        let run_dir = cfg.result_path.join(cfg.run_name());
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("Cannot create run directory '{}'", run_dir.display()))?;

        let layout    = Self { run_dir };
        let model_dir = layout.weights_dir();
        fs::create_dir_all(&model_dir)
            .with_context(|| format!("Cannot create weights directory '{}'", model_dir.display()))?;

        cfg.model_path      = Some(model_dir);
        cfg.best_model_path = Some(layout.best_model());

        let copy = layout.run_dir.join(CONFIG_COPY);
        fs::write(&copy, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config copy to '{}'", copy.display()))?;

        tracing::info!("Results will be written to '{}'", layout.run_dir.display());
        Ok(layout)
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn weights_dir(&self) -> PathBuf {
        self.run_dir.join(WEIGHTS_DIR)
    }

    /// Best-model checkpoint, with the extension the recorder writes
    pub fn best_model(&self) -> PathBuf {
        self.run_dir.join(BEST_MODEL).with_extension(CHECKPOINT_EXTENSION)
    }

    pub fn run_log(&self) -> PathBuf {
        self.run_dir.join(RUN_LOG)
    }

    pub fn tracking_file(&self) -> PathBuf {
        self.run_dir.join(TRACKING_FILE)
    }
}
