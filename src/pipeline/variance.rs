//! Injectable randomness for the synthetic-data generator.
//!
//! Work-hours and sales figures derived from a roster are simulated, not
//! measured. All randomness goes through [`VarianceSource`] so tests can
//! script exact outcomes and runs can be reproduced from a seed.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of simulated variance.
pub trait VarianceSource {
    /// Returns an integer in `low..=high`. Implementations must tolerate
    /// `low > high` by returning a value in the reversed range.
    fn offset(&mut self, low: i32, high: i32) -> i32;

    /// Returns true with probability `probability` (clamped to `[0, 1]`).
    fn chance(&mut self, probability: f64) -> bool;
}

/// Pseudo-random variance from a seedable generator.
#[derive(Debug, Clone)]
pub struct SeededVariance {
    rng: StdRng,
}

impl SeededVariance {
    /// Creates a reproducible source from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl VarianceSource for SeededVariance {
    fn offset(&mut self, low: i32, high: i32) -> i32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        self.rng.random_range(low..=high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        self.rng.random_bool(p)
    }
}

/// No variance: offsets are as close to zero as the range allows and
/// chances never fire. Derived actuals equal the schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedVariance;

impl VarianceSource for FixedVariance {
    fn offset(&mut self, low: i32, high: i32) -> i32 {
        0_i32.clamp(low.min(high), low.max(high))
    }

    fn chance(&mut self, _probability: f64) -> bool {
        false
    }
}

/// Replays queued offsets and chance outcomes, then behaves like
/// [`FixedVariance`]. Queued offsets are returned as-is, even outside the
/// requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedVariance {
    offsets: VecDeque<i32>,
    chances: VecDeque<bool>,
}

impl ScriptedVariance {
    /// Creates a script from offsets and chance outcomes, consumed in order.
    pub fn new(offsets: impl IntoIterator<Item = i32>, chances: impl IntoIterator<Item = bool>) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
            chances: chances.into_iter().collect(),
        }
    }
}

impl VarianceSource for ScriptedVariance {
    fn offset(&mut self, low: i32, high: i32) -> i32 {
        self.offsets
            .pop_front()
            .unwrap_or_else(|| FixedVariance.offset(low, high))
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}
