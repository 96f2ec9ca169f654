// ============================================================
// Layer 3 — Reporting Traits
// ============================================================
// The training loop never reaches into process-wide logging or
// a global tracking session. It is handed implementations of
// these two traits (bundled in infra::sinks::Sinks) and writes
// to them explicitly.
//
// Implementations:
//   - JsonlTracker → ExperimentTracker, one JSON line per event
//   - FileRunLog   → RunLog, human-readable results.log
//   - (tests)      → in-memory recorders

use anyhow::Result;

use crate::domain::record::EpochMetrics;

// ─── ExperimentTracker ────────────────────────────────────────────────────────
/// A remote-dashboard style tracking session.
pub trait ExperimentTracker {
    /// Record one epoch's metrics
    fn log_metrics(&mut self, metrics: &EpochMetrics) -> Result<()>;

    /// Raise an alert. `kind` is the error category.
    fn alert(&mut self, title: &str, text: &str, kind: &str) -> Result<()>;

    /// Close the session after a successful run
    fn finish(&mut self) -> Result<()>;
}

// ─── RunLog ───────────────────────────────────────────────────────────────────
/// A line-oriented, human-readable run log.
pub trait RunLog {
    fn info(&mut self, line: &str) -> Result<()>;

    fn error(&mut self, line: &str) -> Result<()>;
}
