//! Configuration for the write connector.

use std::env;

/// Write path configuration.
///
/// All knobs have serviceable defaults; environment variables override them
/// via [`WriterConfig::from_env`].
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Number of buffered records that triggers a flush
    pub batch_size: usize,
    /// Upper bound on one store write/sync attempt, in milliseconds
    pub timeout_ms: u64,
    /// Whether records expire according to their schema's max age
    pub enable_ttl: bool,
    /// Upper bound (exclusive) of random jitter added to TTLs, in seconds.
    /// Zero disables jitter.
    pub max_ttl_jitter_seconds: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            timeout_ms: 2000,
            enable_ttl: false,
            max_ttl_jitter_seconds: 0,
        }
    }
}

impl WriterConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for unset values.
    ///
    /// Recognized variables: `PLUME_BATCH_SIZE`, `PLUME_TIMEOUT_MS`,
    /// `PLUME_ENABLE_TTL`, `PLUME_MAX_TTL_JITTER_SECONDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("PLUME_BATCH_SIZE") {
            config.batch_size = parse_var("PLUME_BATCH_SIZE", &value)?;
        }
        if let Ok(value) = env::var("PLUME_TIMEOUT_MS") {
            config.timeout_ms = parse_var("PLUME_TIMEOUT_MS", &value)?;
        }
        if let Ok(value) = env::var("PLUME_ENABLE_TTL") {
            config.enable_ttl = parse_bool("PLUME_ENABLE_TTL", &value)?;
        }
        if let Ok(value) = env::var("PLUME_MAX_TTL_JITTER_SECONDS") {
            config.max_ttl_jitter_seconds = parse_var("PLUME_MAX_TTL_JITTER_SECONDS", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style override for the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder-style override for the write timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Builder-style override for the TTL switch.
    pub fn with_ttl(mut self, enable_ttl: bool, max_jitter_seconds: u32) -> Self {
        self.enable_ttl = enable_ttl;
        self.max_ttl_jitter_seconds = max_jitter_seconds;
        self
    }

    /// Reject configurations the write path cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "true" | "TRUE" => Ok(true),
        "0" | "false" | "FALSE" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("batch size must be positive")]
    InvalidBatchSize,

    #[error("timeout must be positive")]
    InvalidTimeout,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
