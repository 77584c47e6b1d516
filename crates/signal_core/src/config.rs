//! # Cycle Timing Configuration
//!
//! All timing knobs of a traffic light in one place. Loaded once at startup,
//! either from code (`Default`, [`CycleConfig::fast`]) or from a TOML table:
//!
//! ```toml
//! min_cycle_ms = 4000
//! max_cycle_ms = 7000
//! poll_interval_ms = 1
//! send_delay_ms = 0
//! seed = 42
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Timing configuration for a [`PhaseCycler`](crate::light::PhaseCycler).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Shortest cycle duration in milliseconds (inclusive).
    pub min_cycle_ms: u64,
    /// Longest cycle duration in milliseconds (exclusive).
    pub max_cycle_ms: u64,
    /// Sleep between two elapsed-time checks of the background task.
    pub poll_interval_ms: u64,
    /// Simulated production cost paid by every send, outside the lock.
    pub send_delay_ms: u64,
    /// Seed for the cycle schedule. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_cycle_ms: 4_000,
            max_cycle_ms: 7_000, // draws land in [4000, 6999]
            poll_interval_ms: 1,
            send_delay_ms: 0,
            seed: None,
        }
    }
}

impl CycleConfig {
    /// Short cycles for demos and tests: 40-69 ms per phase.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            min_cycle_ms: 40,
            max_cycle_ms: 70,
            poll_interval_ms: 1,
            send_delay_ms: 0,
            seed: None,
        }
    }

    /// Returns a copy with an explicit schedule seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy with the given cycle range in milliseconds.
    #[must_use]
    pub const fn with_cycle_range(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_cycle_ms = min_ms;
        self.max_cycle_ms = max_ms;
        self
    }

    /// Checks the invariants the background task relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] unless `0 < min < max`, and
    /// [`ConfigError::ZeroPollInterval`] if the poll interval is zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_cycle_ms == 0 || self.min_cycle_ms >= self.max_cycle_ms {
            return Err(ConfigError::InvalidRange {
                min: self.min_cycle_ms,
                max: self.max_cycle_ms,
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    /// Parses and validates a config from a TOML document.
    ///
    /// Missing keys fall back to [`CycleConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys, or
    /// the [`validate`](Self::validate) error for out-of-range values.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Shortest cycle duration.
    #[inline]
    #[must_use]
    pub const fn min_cycle(&self) -> Duration {
        Duration::from_millis(self.min_cycle_ms)
    }

    /// Longest cycle duration (exclusive).
    #[inline]
    #[must_use]
    pub const fn max_cycle(&self) -> Duration {
        Duration::from_millis(self.max_cycle_ms)
    }

    /// Sleep between two checks of the background task.
    #[inline]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Delay paid by each send before taking the mailbox lock.
    #[inline]
    #[must_use]
    pub const fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CycleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_cycle(), Duration::from_millis(4_000));
        assert_eq!(config.max_cycle(), Duration::from_millis(7_000));
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_fast_is_valid() {
        assert!(CycleConfig::fast().validate().is_ok());
    }

    #[test]
    fn test_invalid_ranges() {
        let empty = CycleConfig::default().with_cycle_range(500, 500);
        assert_eq!(
            empty.validate(),
            Err(ConfigError::InvalidRange { min: 500, max: 500 })
        );

        let zero = CycleConfig::default().with_cycle_range(0, 10);
        assert!(matches!(zero.validate(), Err(ConfigError::InvalidRange { .. })));

        let no_poll = CycleConfig {
            poll_interval_ms: 0,
            ..CycleConfig::default()
        };
        assert_eq!(no_poll.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CycleConfig::from_toml_str("min_cycle_ms = 100\nmax_cycle_ms = 200\nseed = 7\n")
            .unwrap();
        assert_eq!(config.min_cycle_ms, 100);
        assert_eq!(config.max_cycle_ms, 200);
        assert_eq!(config.seed, Some(7));
        // Unspecified keys keep their defaults
        assert_eq!(config.poll_interval_ms, 1);
        assert_eq!(config.send_delay_ms, 0);
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(matches!(
            CycleConfig::from_toml_str("min_cycle_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            CycleConfig::from_toml_str("cycle_length = 5"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            CycleConfig::from_toml_str("min_cycle_ms = 9000"),
            Err(ConfigError::InvalidRange { min: 9_000, max: 7_000 })
        );
    }
}
