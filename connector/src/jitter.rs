//! Random jitter source backed by the thread-local RNG.

use plume_engine::Jitter;
use rand::Rng;

/// Jitter drawn uniformly from the thread-local random number generator.
///
/// This is the production source; tests inject deterministic ones instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&mut self, bound: u32) -> u32 {
        rand::thread_rng().gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_bound() {
        let mut jitter = RandomJitter;
        for _ in 0..1000 {
            assert!(jitter.sample(10) < 10);
        }
    }

    #[test]
    fn bound_of_one_is_always_zero() {
        let mut jitter = RandomJitter;
        assert_eq!(jitter.sample(1), 0);
    }
}
