//! # Cycle Schedule
//!
//! Source of randomized cycle durations for one traffic light.
//!
//! Each light owns its own ChaCha8 generator. Seeded schedules are fully
//! reproducible, so alternation and timing can be checked in tests without
//! sharing a global random source between lights.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use crate::config::CycleConfig;
use crate::error::ConfigResult;

/// Draws cycle durations uniformly from `[min_cycle_ms, max_cycle_ms)`.
#[derive(Clone, Debug)]
pub struct CycleSchedule {
    rng: ChaCha8Rng,
    min_ms: u64,
    max_ms: u64,
}

impl CycleSchedule {
    /// Creates a reproducible schedule.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error if the range is unusable.
    pub fn from_seed(seed: u64, config: &CycleConfig) -> ConfigResult<Self> {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), config)
    }

    /// Creates a schedule seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error if the range is unusable.
    pub fn from_entropy(config: &CycleConfig) -> ConfigResult<Self> {
        Self::with_rng(ChaCha8Rng::from_entropy(), config)
    }

    /// Uses `config.seed` when present, OS entropy otherwise.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error if the range is unusable.
    pub fn from_config(config: &CycleConfig) -> ConfigResult<Self> {
        match config.seed {
            Some(seed) => Self::from_seed(seed, config),
            None => Self::from_entropy(config),
        }
    }

    fn with_rng(rng: ChaCha8Rng, config: &CycleConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            rng,
            min_ms: config.min_cycle_ms,
            max_ms: config.max_cycle_ms,
        })
    }

    /// Draws the next cycle duration.
    pub fn next_duration(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_ms..self.max_ms))
    }

    /// Returns the `(inclusive, exclusive)` bounds of the draws.
    #[must_use]
    pub const fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}
