//! Error types for the Plume engine.

use crate::FeatureSetId;
use thiserror::Error;

/// All possible errors from the Plume engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No schema is registered for a feature-set identifier. Encoding cannot
    /// proceed without one; this signals operator misconfiguration.
    #[error("no schema registered for feature set: {0}")]
    MissingSchema(FeatureSetId),

    /// The record carries no value for an entity the schema declares.
    /// Entity fields key the record and have no meaningful default.
    #[error("record for feature set '{feature_set}' is missing entity field '{entity}'")]
    MissingEntity {
        feature_set: FeatureSetId,
        entity: String,
    },

    #[error("failed to encode storage entry: {0}")]
    Encode(String),

    #[error("failed to decode storage entry: {0}")]
    Decode(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::MissingSchema("driver_stats".into());
        assert_eq!(
            err.to_string(),
            "no schema registered for feature set: driver_stats"
        );

        let err = Error::MissingEntity {
            feature_set: "driver_stats".into(),
            entity: "driver_id".into(),
        };
        assert_eq!(
            err.to_string(),
            "record for feature set 'driver_stats' is missing entity field 'driver_id'"
        );
    }
}
