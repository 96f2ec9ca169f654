// ============================================================
// Layer 6 — Run Log
// ============================================================
// Human-readable log of a run, appended to <run>/results.log.
// Every line is also mirrored to `tracing` so it shows up on the
// console under the normal subscriber.
//
// Example:
//   INFO: Epoch: 0, Loss: 0.693147, Accuracy: 50.00%
//   INFO: Epoch: 1, Loss: 0.412345, Accuracy: 81.25%
//   INFO: Best accuracy: 81.25%

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::traits::RunLog;

pub struct FileRunLog {
    path: PathBuf,
}

impl FileRunLog {
    /// Open (or create) the log file. Earlier runs in the same
    /// directory are appended to, not overwritten.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Cannot open run log '{}'", path.display()))?;
        Ok(Self { path })
    }

    fn write_line(&self, level: &str, line: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open run log '{}'", self.path.display()))?;
        writeln!(f, "{level}: {line}")?;
        Ok(())
    }
}

impl RunLog for FileRunLog {
    fn info(&mut self, line: &str) -> Result<()> {
        tracing::info!("{}", line);
        self.write_line("INFO", line)
    }

    fn error(&mut self, line: &str) -> Result<()> {
        tracing::error!("{}", line);
        self.write_line("ERROR", line)
    }
}
