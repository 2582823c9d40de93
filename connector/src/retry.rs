//! Exponential backoff policy for transient store failures.
//!
//! Backoff formula: `min(max_delay, base_delay * 2^attempt)`, with optional
//! uniform jitter of up to 25% in either direction. The retry budget is
//! bounded: `max_retries` attempts at delays capped by `max_delay` puts a
//! hard ceiling on total wall-clock retry time.

use rand::Rng;
use std::time::Duration;

/// Configuration for retry behavior on transient store errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap on any single delay
    pub max_delay: Duration,
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Whether delays get random jitter to avoid synchronized retries
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            max_retries: 4,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a retry config with custom settings.
    pub fn new(base_delay: Duration, max_delay: Duration, max_retries: u32) -> Self {
        Self {
            base_delay,
            max_delay,
            max_retries,
            jitter: true,
        }
    }

    /// Disable jitter, for deterministic tests.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// The delay to sleep before retrying after the given attempt
    /// (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let cap_ms = self.max_delay.as_millis() as u64;

        let exp_ms = base_ms.saturating_mul(1u64 << attempt.min(16)).min(cap_ms);

        let delay_ms = if self.jitter && exp_ms > 0 {
            let spread = exp_ms / 4;
            rand::thread_rng()
                .gen_range(exp_ms.saturating_sub(spread)..=exp_ms + spread)
                .min(cap_ms)
        } else {
            exp_ms
        };

        Duration::from_millis(delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_grow_exponentially() {
        let config = RetryConfig::new(
            Duration::from_millis(100),
            Duration::from_secs(60),
            5,
        )
        .without_jitter();

        assert_eq!(config.delay_for(0), Duration::from_millis(100));
        assert_eq!(config.delay_for(1), Duration::from_millis(200));
        assert_eq!(config.delay_for(2), Duration::from_millis(400));
        assert_eq!(config.delay_for(3), Duration::from_millis(800));
    }

    #[test]
    fn delays_are_capped() {
        let config = RetryConfig::new(
            Duration::from_millis(100),
            Duration::from_millis(500),
            10,
        )
        .without_jitter();

        assert_eq!(config.delay_for(5), Duration::from_millis(500));
        assert_eq!(config.delay_for(40), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_near_the_exponential_delay() {
        let config = RetryConfig::new(
            Duration::from_millis(400),
            Duration::from_secs(60),
            5,
        );

        for _ in 0..100 {
            let delay = config.delay_for(0).as_millis() as u64;
            assert!((300..=500).contains(&delay), "delay out of range: {delay}");
        }
    }
}
