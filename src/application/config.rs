// ============================================================
// Layer 2 — Run Configuration
// ============================================================
// One RunConfig per training run. It is read from a JSON file,
// then CLI flags overlay it, then debug mode applies, and finally
// the result layout fills in the two derived paths.
//
//   config.json ──► from_json_str ──► apply_overrides ──► apply_debug
//                                                          │
//                          ResultLayout::prepare ◄─ validate
//
// Keys this program does not know about are kept in `extra` and
// written back out with the saved copy, so a config file shared
// with other tools round-trips intact.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::{TrainError, TrainResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    // ── Optimisation ─────────────────────────────────────────────────────────
    pub epochs:           usize,
    pub checkpoint_epoch: usize,
    pub lr:               f64,

    // ── Component selectors ──────────────────────────────────────────────────
    #[serde(default = "default_detection_model")]
    pub detection_model: String,
    #[serde(default = "default_main_model")]
    pub main_model: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,

    // ── Reporting flags ──────────────────────────────────────────────────────
    #[serde(default = "default_true")]
    pub wandb: bool,
    #[serde(default = "default_true")]
    pub log: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_project")]
    pub project: String,

    // ── Result directory ─────────────────────────────────────────────────────
    #[serde(default = "default_result_path")]
    pub result_path: PathBuf,
    #[serde(default)]
    pub tag: String,

    // ── Data ─────────────────────────────────────────────────────────────────
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_true")]
    pub shuffle: bool,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,
    #[serde(default = "default_feature_dim")]
    pub feature_dim: usize,
    #[serde(default = "default_num_classes")]
    pub num_classes: usize,

    // ── Model shape ──────────────────────────────────────────────────────────
    #[serde(default = "default_hidden_dim")]
    pub hidden_dim: usize,
    #[serde(default = "default_representation_dim")]
    pub representation_dim: usize,
    #[serde(default)]
    pub dropout: f64,

    // ── Derived by ResultLayout::prepare ─────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_model_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_detection_model()    -> String  { "mlp".into() }
fn default_main_model()         -> String  { "projection".into() }
fn default_dataset()            -> String  { "synthetic".into() }
fn default_project()            -> String  { "bad_content_detection".into() }
fn default_result_path()        -> PathBuf { PathBuf::from("results") }
fn default_true()               -> bool    { true }
fn default_batch_size()         -> usize   { 32 }
fn default_seed()               -> u64     { 42 }
fn default_num_samples()        -> usize   { 512 }
fn default_feature_dim()        -> usize   { 16 }
fn default_num_classes()        -> usize   { 2 }
fn default_hidden_dim()         -> usize   { 64 }
fn default_representation_dim() -> usize   { 32 }

/// Values given on the command line. `None` means "flag not
/// given" and leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub detection_model: Option<String>,
    pub main_model:      Option<String>,
    pub dataset:         Option<String>,
    pub debug:           Option<bool>,
    pub wandb:           Option<bool>,
    pub log:             Option<bool>,
    pub tag:             Option<String>,
}

impl RunConfig {
    /// Read, overlay, apply debug mode and validate.
    pub fn load(path: impl AsRef<Path>, overrides: ConfigOverrides) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&json)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;

        cfg.apply_overrides(overrides);
        cfg.apply_debug();
        cfg.validate()?;

        tracing::debug!("Loaded config from '{}': {:?}", path.display(), cfg);
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn apply_overrides(&mut self, o: ConfigOverrides) {
        if let Some(v) = o.detection_model { self.detection_model = v; }
        if let Some(v) = o.main_model      { self.main_model      = v; }
        if let Some(v) = o.dataset         { self.dataset         = v; }
        if let Some(v) = o.debug           { self.debug           = v; }
        if let Some(v) = o.wandb           { self.wandb           = v; }
        if let Some(v) = o.log             { self.log             = v; }
        if let Some(v) = o.tag             { self.tag             = v; }
    }

    /// Debug runs never report anywhere
    pub fn apply_debug(&mut self) {
        if self.debug {
            self.wandb = false;
            self.log   = false;
        }
    }

    pub fn validate(&self) -> TrainResult<()> {
        if self.epochs == 0 {
            return Err(TrainError::config("epochs must be a positive integer"));
        }
        if self.checkpoint_epoch == 0 {
            return Err(TrainError::config("checkpoint_epoch must be a positive integer"));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(TrainError::config(format!("lr must be a positive number, got {}", self.lr)));
        }
        if self.batch_size == 0 {
            return Err(TrainError::config("batch_size must be a positive integer"));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(TrainError::config(format!("dropout must be in [0, 1), got {}", self.dropout)));
        }
        for (key, value) in [
            ("detection_model", &self.detection_model),
            ("main_model", &self.main_model),
            ("dataset", &self.dataset),
        ] {
            if value.trim().is_empty() {
                return Err(TrainError::config(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Directory name of this run under `result_path`
    pub fn run_name(&self) -> String {
        format!("{}_{}_{}_{}", self.detection_model, self.main_model, self.dataset, self.tag)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"{"epochs": 5, "checkpoint_epoch": 2, "lr": 0.001}"#;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let cfg = RunConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(cfg.detection_model, "mlp");
        assert_eq!(cfg.main_model, "projection");
        assert_eq!(cfg.dataset, "synthetic");
        assert!(cfg.wandb);
        assert!(cfg.log);
        assert!(!cfg.debug);
        assert_eq!(cfg.batch_size, 32);
        assert!(cfg.model_path.is_none());
        assert!(cfg.best_model_path.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_missing_required_key_is_rejected() {
        let err = RunConfig::from_json_str(r#"{"epochs": 5, "lr": 0.001}"#).unwrap_err();
        assert!(err.to_string().contains("checkpoint_epoch"));
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let cfg = RunConfig::from_json_str(
            r#"{"epochs": 1, "checkpoint_epoch": 1, "lr": 1, "layer_index": 12, "note": "x"}"#,
        )
        .unwrap();
        assert_eq!(cfg.lr, 1.0);
        assert_eq!(cfg.extra["layer_index"], 12);

        let back = serde_json::to_value(&cfg).unwrap();
        assert_eq!(back["note"], "x");
        assert!(back.get("model_path").is_none());
    }

    #[test]
    fn test_cli_overrides_only_given_flags() {
        let mut cfg = RunConfig::from_json_str(
            r#"{"epochs": 1, "checkpoint_epoch": 1, "lr": 0.1, "dataset": "jsonl", "tag": "file"}"#,
        )
        .unwrap();
        cfg.apply_overrides(ConfigOverrides {
            detection_model: Some("linear".into()),
            wandb:           Some(false),
            ..Default::default()
        });
        assert_eq!(cfg.detection_model, "linear");
        assert_eq!(cfg.dataset, "jsonl");
        assert_eq!(cfg.tag, "file");
        assert!(!cfg.wandb);
        assert!(cfg.log);
    }

    #[test]
    fn test_debug_disables_reporting() {
        let mut cfg = RunConfig::from_json_str(MINIMAL).unwrap();
        cfg.apply_overrides(ConfigOverrides { debug: Some(true), ..Default::default() });
        cfg.apply_debug();
        assert!(!cfg.wandb);
        assert!(!cfg.log);
    }

    #[test]
    fn test_validation_errors_are_config_kind() {
        for json in [
            r#"{"epochs": 0, "checkpoint_epoch": 1, "lr": 0.1}"#,
            r#"{"epochs": 1, "checkpoint_epoch": 0, "lr": 0.1}"#,
            r#"{"epochs": 1, "checkpoint_epoch": 1, "lr": 0.0}"#,
            r#"{"epochs": 1, "checkpoint_epoch": 1, "lr": 0.1, "batch_size": 0}"#,
            r#"{"epochs": 1, "checkpoint_epoch": 1, "lr": 0.1, "dropout": 1.0}"#,
            r#"{"epochs": 1, "checkpoint_epoch": 1, "lr": 0.1, "dataset": " "}"#,
        ] {
            let cfg = RunConfig::from_json_str(json).unwrap();
            let err = cfg.validate().unwrap_err();
            assert_eq!(err.kind(), "config", "{json}");
        }
    }

    #[test]
    fn test_load_from_file() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"epochs": 3, "checkpoint_epoch": 1, "lr": 0.01, "debug": true}"#)
            .unwrap();

        let cfg = RunConfig::load(&path, ConfigOverrides::default()).unwrap();
        assert_eq!(cfg.epochs, 3);
        assert!(!cfg.wandb && !cfg.log);

        assert!(RunConfig::load(tmp.path().join("missing.json"), ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_run_name() {
        let mut cfg = RunConfig::from_json_str(MINIMAL).unwrap();
        cfg.tag = "v2".into();
        assert_eq!(cfg.run_name(), "mlp_projection_synthetic_v2");
    }
}
