//! Output streams of the write path.
//!
//! Every processed record is emitted on exactly one of two channels:
//! successful records flow onward in the pipeline, failure records flow to
//! the external failure sink. Messages carry an event-time marker so the
//! downstream engine can slot them into time-based processing.

use crate::failure::FailureRecord;
use plume_engine::FeatureRecord;
use tokio::sync::mpsc;

/// A message on an output channel, stamped with its emission time.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted<T> {
    pub value: T,
    /// Emission time, milliseconds since the Unix epoch
    pub event_time_ms: i64,
}

/// Sending half of the write path's two output streams.
#[derive(Debug, Clone)]
pub struct Outputs {
    pub successful: mpsc::UnboundedSender<Emitted<FeatureRecord>>,
    pub failed: mpsc::UnboundedSender<Emitted<FailureRecord>>,
}

impl Outputs {
    /// Create the output pair along with their receiving halves.
    pub fn channels() -> (
        Self,
        mpsc::UnboundedReceiver<Emitted<FeatureRecord>>,
        mpsc::UnboundedReceiver<Emitted<FailureRecord>>,
    ) {
        let (successful_tx, successful_rx) = mpsc::unbounded_channel();
        let (failed_tx, failed_rx) = mpsc::unbounded_channel();
        (
            Self {
                successful: successful_tx,
                failed: failed_tx,
            },
            successful_rx,
            failed_rx,
        )
    }

    /// Emit a successfully written record. Delivery is best-effort: a
    /// dropped receiver means the pipeline is shutting down.
    pub fn emit_success(&self, record: FeatureRecord, event_time_ms: i64) {
        let _ = self.successful.send(Emitted {
            value: record,
            event_time_ms,
        });
    }

    /// Emit a failure record.
    pub fn emit_failure(&self, failure: FailureRecord, event_time_ms: i64) {
        let _ = self.failed.send(Emitted {
            value: failure,
            event_time_ms,
        });
    }
}
