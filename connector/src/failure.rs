//! Conversion of write failures and staleness skips into failure records.
//!
//! Pure transformation: the router produces structured records for the
//! external failure sink and nothing else. The staleness message is fixed
//! and distinct from write-failure messages so operators can separate
//! "could not write" from "chose not to write".

use crate::error::SinkError;
use plume_engine::FeatureRecord;
use serde::Serialize;

/// Name this connector reports in failure records.
pub const TRANSFORM_NAME: &str = "online-store-writer";

/// Fixed message attached to records the TTL policy chose not to write.
pub const STALE_MESSAGE: &str = "record skipped: event timestamp older than feature set max age";

/// A record that could not be, or deliberately was not, written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    /// Pipeline job the record belonged to
    pub job_name: String,
    /// Transform that produced this failure
    pub transform_name: String,
    /// The original record, rendered as a string
    pub payload: String,
    /// Human-readable description of what went wrong
    pub error_message: String,
    /// Error chain detail for write failures; absent for staleness skips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl FailureRecord {
    /// Failure record for a write that the store path could not complete.
    pub fn write_failed(record: &FeatureRecord, error: &SinkError, job_name: &str) -> Self {
        Self {
            job_name: job_name.to_string(),
            transform_name: TRANSFORM_NAME.to_string(),
            payload: render_payload(record),
            error_message: error.to_string(),
            trace: Some(format!("{error:?}")),
        }
    }

    /// Failure record for a record skipped because it was already stale.
    pub fn stale(record: &FeatureRecord, job_name: &str) -> Self {
        Self {
            job_name: job_name.to_string(),
            transform_name: TRANSFORM_NAME.to_string(),
            payload: render_payload(record),
            error_message: STALE_MESSAGE.to_string(),
            trace: None,
        }
    }
}

fn render_payload(record: &FeatureRecord) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| format!("{record:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use plume_engine::{FeatureValue, Field};

    fn test_record() -> FeatureRecord {
        FeatureRecord::new(
            "driver_stats",
            1000,
            vec![Field::new("driver_id", FeatureValue::Int(7))],
        )
    }

    #[test]
    fn write_failure_carries_error_and_trace() {
        let error = SinkError::Store(StoreError::Rejected("oom".into()));
        let failure = FailureRecord::write_failed(&test_record(), &error, "ingest-job");

        assert_eq!(failure.job_name, "ingest-job");
        assert_eq!(failure.transform_name, TRANSFORM_NAME);
        assert_eq!(failure.error_message, "store error: store rejected the command: oom");
        assert!(failure.trace.is_some());
        assert!(failure.payload.contains("driver_stats"));
    }

    #[test]
    fn stale_skip_uses_the_fixed_message() {
        let failure = FailureRecord::stale(&test_record(), "ingest-job");

        assert_eq!(failure.error_message, STALE_MESSAGE);
        assert!(failure.trace.is_none());
    }

    #[test]
    fn stale_and_failed_messages_are_distinct() {
        let error = SinkError::Store(StoreError::NotConnected);
        let failed = FailureRecord::write_failed(&test_record(), &error, "job");
        let stale = FailureRecord::stale(&test_record(), "job");

        assert_ne!(failed.error_message, stale.error_message);
    }

    #[test]
    fn payload_is_json() {
        let failure = FailureRecord::stale(&test_record(), "job");
        let parsed: serde_json::Value = serde_json::from_str(&failure.payload).unwrap();
        assert_eq!(parsed["featureSet"], "driver_stats");
    }
}
