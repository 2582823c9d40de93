//! Feature-set schema definitions.
//!
//! A schema fixes which entities key a feature set, which features it
//! contains, and how long its records stay fresh. Schemas are supplied by an
//! external registry and treated as read-only here.

use crate::FeatureSetId;
use serde::{Deserialize, Serialize};

/// Schema for one feature set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSetSchema {
    /// Feature-set identifier
    pub name: FeatureSetId,
    /// Names of the entity fields that key records of this feature set
    pub entities: Vec<String>,
    /// Names of the features this set contains
    pub features: Vec<String>,
    /// Maximum age in seconds before a record is too stale to serve.
    /// Zero means no staleness bound and no TTL.
    pub max_age_seconds: u64,
}

impl FeatureSetSchema {
    /// Create a schema without a staleness bound.
    pub fn new(
        name: impl Into<FeatureSetId>,
        entities: Vec<String>,
        features: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entities,
            features,
            max_age_seconds: 0,
        }
    }

    /// Builder-style method to set the maximum age.
    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    /// Whether this schema bounds record staleness.
    pub fn has_max_age(&self) -> bool {
        self.max_age_seconds > 0
    }

    /// Entity names sorted ascending - the key ordering contract.
    pub fn sorted_entities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Feature names sorted ascending - the value ordering contract.
    pub fn sorted_features(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.features.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
