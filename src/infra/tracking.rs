// ============================================================
// Layer 6 — Experiment Tracker
// ============================================================
// A file-backed tracking session. Each event is one JSON object
// on its own line, so the file can be tailed while a run is in
// progress or shipped to a dashboard afterwards.
//
// Output file: <run>/tracking.jsonl
//
// Example:
//   {"event":"init","project":"bad_content_detection","config":{...}}
//   {"event":"log","Epoch":0,"Loss":0.6931,"Accuracy":51.2}
//   {"event":"log","Epoch":1,"Loss":0.4410,"Accuracy":78.9}
//   {"event":"finish","epochs_logged":2}
//
// On failure an alert replaces the finish event:
//   {"event":"alert","title":"Training Error","text":"...","kind":"compute"}

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::{record::EpochMetrics, traits::ExperimentTracker};

pub struct JsonlTracker {
    path:          PathBuf,
    epochs_logged: usize,
    finished:      bool,
}

impl JsonlTracker {
    /// Start a session. Truncates any file left by an earlier run
    /// with the same name and writes the `init` event.
    pub fn init(path: impl AsRef<Path>, project: &str, config: &impl Serialize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(&path)
            .with_context(|| format!("Cannot create tracking file '{}'", path.display()))?;

        let mut tracker = Self { path, epochs_logged: 0, finished: false };
        tracker.append(&json!({
            "event":   "init",
            "project": project,
            "config":  serde_json::to_value(config)?,
        }))?;
        tracing::info!("Tracking session started: '{}'", tracker.path.display());
        Ok(tracker)
    }

    fn append(&mut self, event: &Value) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open tracking file '{}'", self.path.display()))?;
        writeln!(f, "{}", serde_json::to_string(event)?)?;
        Ok(())
    }
}

impl ExperimentTracker for JsonlTracker {
    fn log_metrics(&mut self, metrics: &EpochMetrics) -> Result<()> {
        let mut event = serde_json::to_value(metrics)?;
        if let Value::Object(map) = &mut event {
            map.insert("event".into(), json!("log"));
        }
        self.append(&event)?;
        self.epochs_logged += 1;
        Ok(())
    }

    fn alert(&mut self, title: &str, text: &str, kind: &str) -> Result<()> {
        self.append(&json!({
            "event": "alert",
            "title": title,
            "text":  text,
            "kind":  kind,
        }))
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        let logged = self.epochs_logged;
        self.append(&json!({ "event": "finish", "epochs_logged": logged }))?;
        self.finished = true;
        tracing::debug!("Tracking session closed after {} epochs", logged);
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn events(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_session_lifecycle() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("run/tracking.jsonl");

        let mut tracker = JsonlTracker::init(&path, "proj", &json!({"lr": 0.1})).unwrap();
        tracker.log_metrics(&EpochMetrics { epoch: 0, loss: 0.7, accuracy: 55.0 }).unwrap();
        tracker.finish().unwrap();
        tracker.finish().unwrap();

        let ev = events(&path);
        assert_eq!(ev.len(), 3);
        assert_eq!(ev[0]["event"], "init");
        assert_eq!(ev[0]["config"]["lr"], 0.1);
        assert_eq!(ev[1]["event"], "log");
        assert_eq!(ev[1]["Epoch"], 0);
        assert_eq!(ev[1]["Accuracy"], 55.0);
        assert_eq!(ev[2]["event"], "finish");
        assert_eq!(ev[2]["epochs_logged"], 1);
    }

    #[test]
    fn test_alert_record() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("tracking.jsonl");

        let mut tracker = JsonlTracker::init(&path, "proj", &json!({})).unwrap();
        tracker.alert("Training Error", "compute error: boom", "compute").unwrap();

        let ev = events(&path);
        assert_eq!(ev[1]["event"], "alert");
        assert_eq!(ev[1]["title"], "Training Error");
        assert_eq!(ev[1]["kind"], "compute");
    }

    #[test]
    fn test_init_truncates_previous_run() {
        let tmp  = tempdir().unwrap();
        let path = tmp.path().join("tracking.jsonl");
        fs::write(&path, "stale\n").unwrap();

        JsonlTracker::init(&path, "proj", &json!({})).unwrap();
        assert_eq!(events(&path).len(), 1);
    }
}
