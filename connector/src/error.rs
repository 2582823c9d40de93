//! Unified error handling for the write connector.

use crate::config::ConfigError;
use crate::store::StoreError;

/// Write path error type.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// A store operation failed and was classified non-retriable
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Encoding or schema resolution failed for a record
    #[error("encoding error: {0}")]
    Engine(#[from] plume_engine::Error),

    /// Transient store failures persisted past the retry budget
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    /// The connector was configured with values it cannot run with
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SinkError::RetriesExhausted {
            attempts: 5,
            source: StoreError::Connection("refused".into()),
        };
        assert_eq!(
            err.to_string(),
            "retries exhausted after 5 attempts: connection failed: refused"
        );

        let err = SinkError::Engine(plume_engine::Error::MissingSchema("trips".into()));
        assert_eq!(
            err.to_string(),
            "encoding error: no schema registered for feature set: trips"
        );
    }
}
