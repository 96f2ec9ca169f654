// ============================================================
// Layer 3 — Training Error Kinds
// ============================================================
// Every failure inside a run is funnelled into one of these
// variants before it reaches the reporting sinks, so an alert
// says *what* broke and not just an opaque message.

use std::path::PathBuf;
use thiserror::Error;

pub type TrainResult<T> = Result<T, TrainError>;

#[derive(Debug, Error)]
pub enum TrainError {
    /// Missing or invalid setting, or an epoch with no batches
    #[error("configuration error: {0}")]
    Config(String),

    /// The data source failed while producing a batch
    #[error("data source error: {0}")]
    DataSource(String),

    /// Forward, loss, backward or optimiser step failed
    #[error("compute error: {0}")]
    Compute(String),

    /// Writing a checkpoint failed
    #[error("persistence error at {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },

    /// A metrics or log sink refused a record
    #[error("reporting error: {0}")]
    Reporting(String),
}

impl TrainError {
    /// Short label used as the category of an alert
    pub fn kind(&self) -> &'static str {
        match self {
            TrainError::Config(_)          => "config",
            TrainError::DataSource(_)      => "data_source",
            TrainError::Compute(_)         => "compute",
            TrainError::Persistence { .. } => "persistence",
            TrainError::Reporting(_)       => "reporting",
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TrainError::Config(msg.into())
    }

    pub fn compute(msg: impl Into<String>) -> Self {
        TrainError::Compute(msg.into())
    }

    /// Collapse an `anyhow` chain from a data source into one line
    pub fn data_source(err: &anyhow::Error) -> Self {
        TrainError::DataSource(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_category() {
        let err = TrainError::Persistence {
            path:    PathBuf::from("runs/a/epoch_0"),
            message: "disk full".into(),
        };
        assert_eq!(err.kind(), "persistence");
        assert_eq!(err.to_string(), "persistence error at runs/a/epoch_0: disk full");
    }

    #[test]
    fn test_data_source_keeps_context_chain() {
        let inner = anyhow::anyhow!("truncated record").context("reading shard 3");
        let err   = TrainError::data_source(&inner);
        assert_eq!(err.kind(), "data_source");
        assert_eq!(err.to_string(), "data source error: reading shard 3: truncated record");
    }
}
