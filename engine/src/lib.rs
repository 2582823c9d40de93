//! # Plume Engine
//!
//! The deterministic core of the Plume feature store write path.
//!
//! This crate turns a feature record plus its feature-set schema into the
//! exact bytes stored in the online key-value store, and decides how long
//! those bytes should live there. It does no IO and holds no state - the
//! same inputs always produce the same outputs.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about the store, the network, or
//!   the upstream processing framework
//! - **Deterministic**: encoding is a pure function of record and schema;
//!   time and randomness are injected, never sampled internally
//! - **Stable layout**: entity and feature ordering is derived from the
//!   schema's sorted names, so any consumer holding the same schema can
//!   reconstruct a record from stored bytes
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`FeatureRecord`] carries a feature-set identifier, an event timestamp,
//! and an ordered list of named [`Field`] values. Records are produced by the
//! upstream engine and are read-only here.
//!
//! ### Schemas
//!
//! A [`FeatureSetSchema`] names the entities that key a feature set, the
//! features it contains, and an optional maximum age after which records are
//! too stale to serve.
//!
//! ### Encoding
//!
//! [`codec::encode`] maps a record and schema to a `(key, value)` byte pair.
//! The key holds the feature-set identifier and entity fields sorted by
//! entity name; the value holds the event timestamp and feature values in
//! feature-name-sorted order with names stripped. Features the record does
//! not carry are encoded as [`FeatureValue::Empty`], so the value layout
//! depends only on the schema.
//!
//! ### TTL Policy
//!
//! [`TtlPolicy::decide`] computes the remaining lifetime of a record from
//! the schema's max age and the record's event timestamp, optionally adding
//! random jitter from an injected [`Jitter`] source. Records whose remaining
//! lifetime is already spent are reported as stale rather than written.
//!
//! ## Quick Start
//!
//! ```rust
//! use plume_engine::{codec, FeatureRecord, FeatureSetSchema, FeatureValue, Field};
//!
//! let schema = FeatureSetSchema::new(
//!     "driver_stats",
//!     vec!["driver_id".into()],
//!     vec!["trips_today".into(), "rating".into()],
//! );
//!
//! let record = FeatureRecord::new(
//!     "driver_stats",
//!     1_700_000_000,
//!     vec![
//!         Field::new("driver_id", FeatureValue::String("d-42".into())),
//!         Field::new("rating", FeatureValue::Double(4.8)),
//!     ],
//! );
//!
//! let (key, value) = codec::encode(&record, &schema).unwrap();
//! assert_eq!(codec::encode(&record, &schema).unwrap(), (key, value));
//! ```

pub mod codec;
pub mod error;
pub mod record;
pub mod schema;
pub mod ttl;

// Re-export main types at crate root
pub use codec::{StorageKey, StorageValue};
pub use error::Error;
pub use record::{FeatureRecord, FeatureValue, Field};
pub use schema::FeatureSetSchema;
pub use ttl::{Jitter, NoJitter, TtlDecision, TtlPolicy};

/// Type aliases for clarity
pub type FeatureSetId = String;
/// Seconds since the Unix epoch.
pub type Timestamp = i64;
