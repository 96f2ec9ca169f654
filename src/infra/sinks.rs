// ============================================================
// Layer 6 — Reporting Sinks
// ============================================================
// The capability object handed to the training loop. Either
// sink may be absent; an absent sink silently accepts nothing.
//
//   tracker — enabled by the `wandb` flag
//   log     — enabled by the `log` flag
//
// Write failures during the run surface as TrainError::Reporting
// and end the run like any other failure. Failures while
// reporting a failure are only traced; there is nowhere left to
// send them.

use crate::domain::{
    error::{TrainError, TrainResult},
    record::EpochMetrics,
    traits::{ExperimentTracker, RunLog},
};

pub const ALERT_TITLE: &str = "Training Error";

#[derive(Default)]
pub struct Sinks {
    tracker: Option<Box<dyn ExperimentTracker>>,
    log:     Option<Box<dyn RunLog>>,
}

impl Sinks {
    pub fn new(
        tracker: Option<Box<dyn ExperimentTracker>>,
        log:     Option<Box<dyn RunLog>>,
    ) -> Self {
        Self { tracker, log }
    }

    /// No tracking, no run log
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn tracking_enabled(&self) -> bool {
        self.tracker.is_some()
    }

    pub fn logging_enabled(&self) -> bool {
        self.log.is_some()
    }

    pub fn emit_metric(&mut self, metrics: &EpochMetrics) -> TrainResult<()> {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker
                .log_metrics(metrics)
                .map_err(|e| TrainError::Reporting(format!("tracker: {e:#}")))?;
        }
        Ok(())
    }

    pub fn emit_log_line(&mut self, line: &str) -> TrainResult<()> {
        if let Some(log) = self.log.as_mut() {
            log.info(line)
                .map_err(|e| TrainError::Reporting(format!("run log: {e:#}")))?;
        }
        Ok(())
    }

    /// Report a run-ending failure to every enabled sink
    pub fn emit_alert(&mut self, err: &TrainError) {
        let text = err.to_string();
        if let Some(tracker) = self.tracker.as_mut() {
            if let Err(e) = tracker.alert(ALERT_TITLE, &text, err.kind()) {
                tracing::warn!("Could not send alert to tracker: {e:#}");
            }
        }
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.error(&text) {
                tracing::warn!("Could not write error to run log: {e:#}");
            }
        }
    }

    /// End the tracking session
    pub fn close(&mut self) -> TrainResult<()> {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker
                .finish()
                .map_err(|e| TrainError::Reporting(format!("tracker: {e:#}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory sinks shared by the unit tests of several layers.

    use std::{cell::RefCell, rc::Rc};

    use anyhow::Result;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Metric(EpochMetrics),
        Alert { title: String, text: String, kind: String },
        Finish,
        Info(String),
        Error(String),
    }

    pub type EventLog = Rc<RefCell<Vec<Event>>>;

    pub struct RecordingTracker {
        pub events:    EventLog,
        pub fail_logs: bool,
    }

    impl ExperimentTracker for RecordingTracker {
        fn log_metrics(&mut self, metrics: &EpochMetrics) -> Result<()> {
            if self.fail_logs {
                anyhow::bail!("dashboard unreachable");
            }
            self.events.borrow_mut().push(Event::Metric(*metrics));
            Ok(())
        }

        fn alert(&mut self, title: &str, text: &str, kind: &str) -> Result<()> {
            self.events.borrow_mut().push(Event::Alert {
                title: title.into(),
                text:  text.into(),
                kind:  kind.into(),
            });
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.events.borrow_mut().push(Event::Finish);
            Ok(())
        }
    }

    pub struct RecordingLog {
        pub events: EventLog,
    }

    impl RunLog for RecordingLog {
        fn info(&mut self, line: &str) -> Result<()> {
            self.events.borrow_mut().push(Event::Info(line.into()));
            Ok(())
        }

        fn error(&mut self, line: &str) -> Result<()> {
            self.events.borrow_mut().push(Event::Error(line.into()));
            Ok(())
        }
    }

    /// Sinks with both halves enabled, plus the shared event lists
    /// (tracker events, log events)
    pub fn recording_sinks() -> (Sinks, EventLog, EventLog) {
        let tracked = EventLog::default();
        let logged  = EventLog::default();
        let sinks = Sinks::new(
            Some(Box::new(RecordingTracker { events: tracked.clone(), fail_logs: false })),
            Some(Box::new(RecordingLog { events: logged.clone() })),
        );
        (sinks, tracked, logged)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_disabled_sinks_accept_everything() {
        let mut sinks = Sinks::disabled();
        let m = EpochMetrics { epoch: 0, loss: 1.0, accuracy: 10.0 };
        assert!(sinks.emit_metric(&m).is_ok());
        assert!(sinks.emit_log_line("x").is_ok());
        sinks.emit_alert(&TrainError::compute("boom"));
        assert!(sinks.close().is_ok());
        assert!(!sinks.tracking_enabled());
        assert!(!sinks.logging_enabled());
    }

    #[test]
    fn test_alert_reaches_both_sinks_once() {
        let (mut sinks, tracked, logged) = recording_sinks();
        sinks.emit_alert(&TrainError::compute("nan in logits"));

        assert_eq!(
            *tracked.borrow(),
            vec![Event::Alert {
                title: ALERT_TITLE.into(),
                text:  "compute error: nan in logits".into(),
                kind:  "compute".into(),
            }]
        );
        assert_eq!(*logged.borrow(), vec![Event::Error("compute error: nan in logits".into())]);
    }

    #[test]
    fn test_tracker_failure_becomes_reporting_error() {
        let events    = EventLog::default();
        let mut sinks = Sinks::new(
            Some(Box::new(RecordingTracker { events, fail_logs: true })),
            None,
        );
        let err = sinks
            .emit_metric(&EpochMetrics { epoch: 0, loss: 0.0, accuracy: 0.0 })
            .unwrap_err();
        assert_eq!(err.kind(), "reporting");
        assert!(err.to_string().contains("dashboard unreachable"));
    }
}
