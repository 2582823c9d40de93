//! Staleness and expiration policy for incoming records.
//!
//! The policy answers one question per record: should it be written at all,
//! and if so, with what expiration? Time and randomness are injected so the
//! decision is reproducible.

use crate::{FeatureRecord, FeatureSetSchema, Timestamp};

/// Source of random jitter added to computed TTLs.
///
/// Injected rather than sampled globally so tests and deterministic replays
/// can fix the sequence.
pub trait Jitter {
    /// A uniform random integer in `[0, bound)`. `bound` is always positive.
    fn sample(&mut self, bound: u32) -> u32;
}

/// Jitter source that never adds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self, _bound: u32) -> u32 {
        0
    }
}

/// Per-record outcome of the TTL policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlDecision {
    /// Write the record. `ttl_seconds == 0` means write without expiration.
    Write { ttl_seconds: u64 },
    /// The record is already older than the schema's max age; skip the write.
    Stale,
}

impl TtlDecision {
    /// Whether this decision results in a write.
    pub fn should_write(&self) -> bool {
        matches!(self, TtlDecision::Write { .. })
    }
}

/// Expiration policy knobs for the write path.
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    /// Whether TTLs are computed at all
    pub enabled: bool,
    /// Upper bound (exclusive) of random jitter added to each TTL.
    /// Zero disables jitter.
    pub max_jitter_seconds: u32,
}

impl TtlPolicy {
    /// Create a policy.
    pub fn new(enabled: bool, max_jitter_seconds: u32) -> Self {
        Self {
            enabled,
            max_jitter_seconds,
        }
    }

    /// Policy that writes everything without expiration.
    pub fn disabled() -> Self {
        Self::new(false, 0)
    }

    /// Decide whether to write a record and with what expiration.
    ///
    /// Rules:
    /// 1. Policy disabled, schema absent, or schema without a max age:
    ///    write without expiration. Schema absence is tolerated here (the
    ///    caller logs it) - retention degrades, serving does not.
    /// 2. Otherwise the TTL is the max age minus the record's current age.
    ///    A spent TTL marks the record stale; jitter never rescues an
    ///    already expired record.
    /// 3. Fresh records get uniform jitter in `[0, max_jitter_seconds)`
    ///    added to spread expirations and avoid eviction storms.
    pub fn decide(
        &self,
        record: &FeatureRecord,
        schema: Option<&FeatureSetSchema>,
        now: Timestamp,
        jitter: &mut dyn Jitter,
    ) -> TtlDecision {
        if !self.enabled {
            return TtlDecision::Write { ttl_seconds: 0 };
        }
        let Some(schema) = schema else {
            return TtlDecision::Write { ttl_seconds: 0 };
        };
        if !schema.has_max_age() {
            return TtlDecision::Write { ttl_seconds: 0 };
        }

        let age = now - record.event_timestamp;
        let remaining = schema.max_age_seconds as i64 - age;
        if remaining <= 0 {
            return TtlDecision::Stale;
        }

        let mut ttl_seconds = remaining as u64;
        if self.max_jitter_seconds > 0 {
            ttl_seconds += jitter.sample(self.max_jitter_seconds) as u64;
        }
        TtlDecision::Write { ttl_seconds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeatureValue, Field};

    /// Jitter source returning a fixed value, for pinning decisions.
    struct FixedJitter(u32);

    impl Jitter for FixedJitter {
        fn sample(&mut self, bound: u32) -> u32 {
            assert!(bound > 0);
            self.0.min(bound - 1)
        }
    }

    fn record_at(event_timestamp: i64) -> FeatureRecord {
        FeatureRecord::new(
            "driver_stats",
            event_timestamp,
            vec![Field::new("driver_id", FeatureValue::Int(1))],
        )
    }

    fn schema_with_max_age(seconds: u64) -> FeatureSetSchema {
        FeatureSetSchema::new("driver_stats", vec!["driver_id".into()], vec![])
            .with_max_age(seconds)
    }

    #[test]
    fn disabled_policy_writes_without_expiration() {
        let policy = TtlPolicy::disabled();
        let schema = schema_with_max_age(100);
        let record = record_at(0); // ancient

        let decision = policy.decide(&record, Some(&schema), 1_000_000, &mut NoJitter);
        assert_eq!(decision, TtlDecision::Write { ttl_seconds: 0 });
    }

    #[test]
    fn missing_schema_writes_without_expiration() {
        let policy = TtlPolicy::new(true, 0);
        let record = record_at(0);

        let decision = policy.decide(&record, None, 1_000_000, &mut NoJitter);
        assert_eq!(decision, TtlDecision::Write { ttl_seconds: 0 });
    }

    #[test]
    fn schema_without_max_age_writes_without_expiration() {
        let policy = TtlPolicy::new(true, 0);
        let schema = schema_with_max_age(0);
        let record = record_at(0);

        let decision = policy.decide(&record, Some(&schema), 1_000_000, &mut NoJitter);
        assert_eq!(decision, TtlDecision::Write { ttl_seconds: 0 });
    }

    #[test]
    fn expired_record_is_stale() {
        let policy = TtlPolicy::new(true, 0);
        let schema = schema_with_max_age(100);
        let now = 10_000;
        let record = record_at(now - 150);

        let decision = policy.decide(&record, Some(&schema), now, &mut NoJitter);
        assert_eq!(decision, TtlDecision::Stale);
        assert!(!decision.should_write());
    }

    #[test]
    fn exactly_expired_record_is_stale() {
        let policy = TtlPolicy::new(true, 0);
        let schema = schema_with_max_age(100);
        let now = 10_000;
        let record = record_at(now - 100); // remaining == 0

        let decision = policy.decide(&record, Some(&schema), now, &mut NoJitter);
        assert_eq!(decision, TtlDecision::Stale);
    }

    #[test]
    fn jitter_does_not_rescue_expired_record() {
        let policy = TtlPolicy::new(true, 1000);
        let schema = schema_with_max_age(100);
        let now = 10_000;
        let record = record_at(now - 150);

        let decision = policy.decide(&record, Some(&schema), now, &mut FixedJitter(999));
        assert_eq!(decision, TtlDecision::Stale);
    }

    #[test]
    fn fresh_record_gets_remaining_ttl() {
        let policy = TtlPolicy::new(true, 0);
        let schema = schema_with_max_age(100);
        let now = 10_000;
        let record = record_at(now - 10);

        let decision = policy.decide(&record, Some(&schema), now, &mut NoJitter);
        assert_eq!(decision, TtlDecision::Write { ttl_seconds: 90 });
    }

    #[test]
    fn jitter_added_within_bound() {
        let policy = TtlPolicy::new(true, 10);
        let schema = schema_with_max_age(100);
        let now = 10_000;
        let record = record_at(now - 10);

        for sample in 0..10 {
            let decision =
                policy.decide(&record, Some(&schema), now, &mut FixedJitter(sample));
            let TtlDecision::Write { ttl_seconds } = decision else {
                panic!("expected a write decision");
            };
            assert!((90..100).contains(&ttl_seconds));
            assert_eq!(ttl_seconds, 90 + sample as u64);
        }
    }
}
