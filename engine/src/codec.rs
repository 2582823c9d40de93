//! Deterministic key/value encoding for the online store.
//!
//! The byte layout is schema-driven: entity and feature names are sorted
//! ascending, and that sorted order alone fixes the position of every value.
//! Encoding the same record against the same schema always yields identical
//! bytes, regardless of the order fields arrived in. Any consumer holding
//! the schema can therefore reconstruct a record from stored bytes.
//!
//! Keys carry entity names alongside values; values carry only the event
//! timestamp and feature values with names stripped, since position in the
//! sorted order already identifies each feature.

use crate::{error::Result, Error, FeatureRecord, FeatureSetId, FeatureSetSchema, FeatureValue, Field, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire structure serialized into the store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageKey {
    /// Feature-set identifier
    pub feature_set: FeatureSetId,
    /// Entity fields, sorted by entity name ascending
    pub entities: Vec<Field>,
}

/// Wire structure serialized into the store value.
///
/// Feature names are stripped; the position of each value in the schema's
/// feature-name-sorted order identifies the feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageValue {
    /// Event time of the encoded record, seconds since the Unix epoch
    pub event_timestamp: Timestamp,
    /// One value per schema feature, in feature-name-sorted order
    pub values: Vec<FeatureValue>,
}

/// Encode a record into its `(key, value)` byte pair.
pub fn encode(record: &FeatureRecord, schema: &FeatureSetSchema) -> Result<(Vec<u8>, Vec<u8>)> {
    let key = encode_key(record, schema)?;
    let value = encode_value(record, schema)?;
    Ok((key, value))
}

/// Encode the store key for a record.
///
/// Entity fields are emitted in entity-name-sorted order. When the record
/// carries duplicate field names, the first occurrence wins - this is a
/// compatibility contract, not an accident. A record missing a declared
/// entity field cannot be keyed and is rejected.
pub fn encode_key(record: &FeatureRecord, schema: &FeatureSetSchema) -> Result<Vec<u8>> {
    let entity_names = schema.sorted_entities();

    let mut entity_fields: HashMap<&str, &FeatureValue> = HashMap::new();
    for field in &record.fields {
        if entity_names.binary_search(&field.name.as_str()).is_ok() {
            entity_fields.entry(field.name.as_str()).or_insert(&field.value);
        }
    }

    let mut entities = Vec::with_capacity(entity_names.len());
    for name in entity_names {
        let value = entity_fields
            .get(name)
            .ok_or_else(|| Error::MissingEntity {
                feature_set: record.feature_set.clone(),
                entity: name.to_string(),
            })?;
        entities.push(Field::new(name, (*value).clone()));
    }

    let key = StorageKey {
        feature_set: record.feature_set.clone(),
        entities,
    };
    bincode::serialize(&key).map_err(|e| Error::Encode(e.to_string()))
}

/// Encode the store value for a record.
///
/// One value slot per schema feature, in feature-name-sorted order. Features
/// the record does not carry are encoded as [`FeatureValue::Empty`]; fields
/// the schema does not declare are dropped.
pub fn encode_value(record: &FeatureRecord, schema: &FeatureSetSchema) -> Result<Vec<u8>> {
    let feature_names = schema.sorted_features();

    let mut feature_fields: HashMap<&str, &FeatureValue> = HashMap::new();
    for field in &record.fields {
        if feature_names.binary_search(&field.name.as_str()).is_ok() {
            feature_fields.entry(field.name.as_str()).or_insert(&field.value);
        }
    }

    let values = feature_names
        .iter()
        .map(|name| {
            feature_fields
                .get(name)
                .map(|value| (*value).clone())
                .unwrap_or_default()
        })
        .collect();

    let value = StorageValue {
        event_timestamp: record.event_timestamp,
        values,
    };
    bincode::serialize(&value).map_err(|e| Error::Encode(e.to_string()))
}

/// Decode a store key back into its structured form.
pub fn decode_key(bytes: &[u8]) -> Result<StorageKey> {
    bincode::deserialize(bytes).map_err(|e| Error::Decode(e.to_string()))
}

/// Decode a store value back into its structured form. Pairing the values
/// with feature names requires the same schema used at encode time.
pub fn decode_value(bytes: &[u8]) -> Result<StorageValue> {
    bincode::deserialize(bytes).map_err(|e| Error::Decode(e.to_string()))
}
