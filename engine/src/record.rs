//! Feature record types flowing through the write path.

use crate::{FeatureSetId, Timestamp};
use serde::{Deserialize, Serialize};

/// A single feature or entity value.
///
/// `Empty` is the canonical default encoded for features the schema declares
/// but the record does not carry, keeping the value layout schema-driven.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

/// A named field within a feature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name, unique within a record (duplicates resolved first-wins)
    pub name: String,
    /// The field's value
    pub value: FeatureValue,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, value: FeatureValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A versioned feature record delivered by the upstream engine.
///
/// Records are immutable once received; the write path reads them, encodes
/// them, and forwards them to an output stream, but never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    /// Identifier of the feature set this record belongs to
    pub feature_set: FeatureSetId,
    /// Event time of the record, seconds since the Unix epoch
    pub event_timestamp: Timestamp,
    /// Named field values, in arrival order
    pub fields: Vec<Field>,
}

impl FeatureRecord {
    /// Create a new feature record.
    pub fn new(
        feature_set: impl Into<FeatureSetId>,
        event_timestamp: Timestamp,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            feature_set: feature_set.into(),
            event_timestamp,
            fields,
        }
    }

    /// Look up a field value by name. The first occurrence wins when the
    /// record carries duplicate names.
    pub fn field(&self, name: &str) -> Option<&FeatureValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}
