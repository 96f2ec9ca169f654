// ============================================================
// Layer 3 — Epoch Records
// ============================================================
// BatchStats   — what one optimisation step reports back
// EpochTally   — running correct/total counters for one epoch,
//                reset at the start of every epoch
// EpochMetrics — the record derived from a finished tally;
//                this is what the sinks receive
//
// The loss carried into EpochMetrics is the loss of the LAST
// batch in the epoch, not an average over the epoch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{TrainError, TrainResult};

/// Result of a single forward/backward/step on one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStats {
    pub batch_size: usize,
    pub correct:    usize,
    pub loss:       f64,
}

/// Per-epoch accumulator. Lives for exactly one epoch.
#[derive(Debug, Default, Clone)]
pub struct EpochTally {
    correct:   usize,
    total:     usize,
    last_loss: Option<f64>,
}

impl EpochTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one batch. A batch claiming more correct predictions
    /// than samples is a broken accuracy computation.
    pub fn record(&mut self, stats: BatchStats) -> TrainResult<()> {
        if stats.correct > stats.batch_size {
            return Err(TrainError::compute(format!(
                "{} correct predictions in a batch of {}",
                stats.correct, stats.batch_size
            )));
        }
        self.total    += stats.batch_size;
        self.correct  += stats.correct;
        self.last_loss = Some(stats.loss);
        Ok(())
    }

    pub fn correct(&self) -> usize { self.correct }

    pub fn total(&self) -> usize { self.total }

    /// Percentage of correctly classified samples, None for an empty epoch
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(100.0 * self.correct as f64 / self.total as f64)
    }

    /// Close the epoch. An epoch that saw no batches has no
    /// defined accuracy and is treated as a configuration error.
    pub fn finish(self, epoch: usize) -> TrainResult<EpochMetrics> {
        match (self.accuracy(), self.last_loss) {
            (Some(accuracy), Some(loss)) => Ok(EpochMetrics { epoch, loss, accuracy }),
            _ => Err(TrainError::config(format!(
                "data source yielded no batches in epoch {epoch}"
            ))),
        }
    }
}

/// One row of tracked metrics. Field names match the tracking
/// dashboard's existing columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    #[serde(rename = "Epoch")]
    pub epoch: usize,

    #[serde(rename = "Loss")]
    pub loss: f64,

    /// Percentage in [0, 100]
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
}

impl fmt::Display for EpochMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch: {}, Loss: {:.6}, Accuracy: {:.2}%",
            self.epoch, self.loss, self.accuracy
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn stats(batch_size: usize, correct: usize, loss: f64) -> BatchStats {
        BatchStats { batch_size, correct, loss }
    }

    #[test]
    fn test_total_is_sum_of_batch_sizes() {
        let mut tally = EpochTally::new();
        for (size, correct) in [(8, 5), (8, 8), (3, 0)] {
            tally.record(stats(size, correct, 0.5)).unwrap();
        }
        assert_eq!(tally.total(), 19);
        assert_eq!(tally.correct(), 13);
        assert!(tally.correct() <= tally.total());
    }

    #[test]
    fn test_accuracy_is_percentage() {
        let mut tally = EpochTally::new();
        tally.record(stats(4, 3, 1.0)).unwrap();
        assert_eq!(tally.accuracy(), Some(75.0));

        let mut perfect = EpochTally::new();
        perfect.record(stats(10, 10, 0.1)).unwrap();
        assert_eq!(perfect.accuracy(), Some(100.0));

        let mut none_right = EpochTally::new();
        none_right.record(stats(10, 0, 2.0)).unwrap();
        assert_eq!(none_right.accuracy(), Some(0.0));
    }

    #[test]
    fn test_more_correct_than_batch_is_compute_error() {
        let mut tally = EpochTally::new();
        tally.record(stats(4, 4, 0.3)).unwrap();

        let err = tally.record(stats(2, 5, 0.0)).unwrap_err();
        assert_eq!(err.kind(), "compute");
        assert!(err.to_string().contains("5 correct predictions in a batch of 2"));

        // The rejected batch leaves the tally untouched
        assert_eq!(tally.correct(), 4);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.finish(0).unwrap().loss, 0.3);
    }

    // Known sharp edge: the reported loss is the final batch's
    // loss. An epoch-mean here would read 2.0.
    #[test]
    fn test_reported_loss_is_last_batch_not_mean() {
        let mut tally = EpochTally::new();
        tally.record(stats(4, 1, 1.0)).unwrap();
        tally.record(stats(4, 2, 3.0)).unwrap();
        let m = tally.finish(7).unwrap();
        assert_eq!(m.loss, 3.0);
        assert_eq!(m.epoch, 7);
        assert_eq!(m.accuracy, 37.5);
    }

    #[test]
    fn test_empty_epoch_is_config_error() {
        let err = EpochTally::new().finish(3).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("epoch 3"));
    }

    #[test]
    fn test_display_line_format() {
        let m = EpochMetrics { epoch: 2, loss: 0.25, accuracy: 81.256 };
        assert_eq!(m.to_string(), "Epoch: 2, Loss: 0.250000, Accuracy: 81.26%");
    }

    #[test]
    fn test_serialized_field_names() {
        let m    = EpochMetrics { epoch: 1, loss: 0.5, accuracy: 50.0 };
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["Epoch"], 1);
        assert_eq!(json["Loss"], 0.5);
        assert_eq!(json["Accuracy"], 50.0);
    }
}
