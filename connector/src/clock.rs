//! Wall-clock abstraction for the write path.
//!
//! Staleness decisions compare event timestamps against "now"; injecting the
//! clock keeps those decisions testable and replayable.

use plume_engine::Timestamp;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time.
pub trait TimeSource: Send {
    /// Seconds since the Unix epoch.
    fn now_seconds(&self) -> Timestamp;

    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_seconds(&self) -> Timestamp {
        self.now_millis() / 1000
    }

    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// A clock pinned to a fixed instant, for tests and deterministic replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The pinned time, seconds since the Unix epoch
    pub seconds: Timestamp,
}

impl FixedClock {
    /// Create a clock pinned at the given epoch second.
    pub fn at(seconds: Timestamp) -> Self {
        Self { seconds }
    }
}

impl TimeSource for FixedClock {
    fn now_seconds(&self) -> Timestamp {
        self.seconds
    }

    fn now_millis(&self) -> i64 {
        self.seconds * 1000
    }
}
