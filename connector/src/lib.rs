//! Plume Connector - the online store write path.
//!
//! This crate takes feature records delivered by an upstream processing
//! engine and persists them into a low-latency key-value store. Records are
//! buffered per bundle, encoded deterministically via `plume-engine`,
//! assigned a TTL, and written in batches through a retryable store client.
//! Every record ends up on exactly one of two output streams: successful
//! records, or structured failure records (write failures and staleness
//! skips) for the external failure sink.
//!
//! The upstream engine drives one [`FeatureWriter`] per worker instance
//! through its lifecycle hooks: `setup` once, `start_bundle` /
//! `process` / `finish_bundle` per bundle, `teardown` at the end. Delivery
//! is at-least-once; the encoding is idempotent per key, so redelivered
//! bundles are safe to write wholesale.

pub mod clock;
pub mod config;
pub mod connection;
pub mod error;
pub mod failure;
pub mod jitter;
pub mod output;
pub mod retry;
pub mod store;
pub mod writer;

pub use clock::{FixedClock, SystemClock, TimeSource};
pub use config::{ConfigError, WriterConfig};
pub use connection::{Connection, ConnectionState};
pub use error::{Result, SinkError};
pub use failure::{FailureRecord, STALE_MESSAGE, TRANSFORM_NAME};
pub use jitter::RandomJitter;
pub use output::{Emitted, Outputs};
pub use retry::RetryConfig;
pub use store::{MemoryStore, StoreClient, StoreError};
pub use writer::{FeatureWriter, FlushSummary};
