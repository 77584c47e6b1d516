//! # Simulation Configuration
//!
//! ```toml
//! lights = 4
//! vehicles_per_light = 3
//! run_ms = 30000
//! vehicle_spacing_ms = 500
//!
//! [cycle]
//! min_cycle_ms = 4000
//! max_cycle_ms = 7000
//! seed = 42
//! ```

use serde::{Deserialize, Serialize};
use signal_core::{ConfigError, CycleConfig};
use std::path::Path;
use std::time::Duration;

use crate::error::{SimError, SimResult};

/// Settings for one simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of intersections, one light each.
    pub lights: u32,
    /// Vehicles queued at every intersection.
    pub vehicles_per_light: u32,
    /// Wall-clock length of the run in milliseconds.
    pub run_ms: u64,
    /// Pause of a vehicle after crossing before it arrives again.
    pub vehicle_spacing_ms: u64,
    /// Timing shared by every light.
    pub cycle: CycleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lights: 4,
            vehicles_per_light: 3,
            run_ms: 30_000,
            vehicle_spacing_ms: 500,
            cycle: CycleConfig::default(),
        }
    }
}

impl SimConfig {
    /// Short run with fast lights, for smoke tests.
    #[must_use]
    pub const fn quick() -> Self {
        Self {
            lights: 2,
            vehicles_per_light: 2,
            run_ms: 600,
            vehicle_spacing_ms: 5,
            cycle: CycleConfig::fast(),
        }
    }

    /// Checks run settings and the nested light timing.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for an empty or zero-length run,
    /// or [`SimError::Config`] for bad light timing.
    pub fn validate(&self) -> SimResult<()> {
        if self.lights == 0 {
            return Err(SimError::InvalidConfig("at least one light is required".into()));
        }
        if self.run_ms == 0 {
            return Err(SimError::InvalidConfig("run_ms must be positive".into()));
        }
        self.cycle.validate()?;
        Ok(())
    }

    /// Parses and validates a config from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] on malformed TOML, or the
    /// [`validate`](Self::validate) error.
    pub fn from_toml_str(source: &str) -> SimResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| SimError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Timing for light `id`.
    ///
    /// A configured seed is offset per light so lights stay reproducible
    /// without cycling in lockstep.
    #[must_use]
    pub fn cycle_for(&self, id: u32) -> CycleConfig {
        let mut cycle = self.cycle.clone();
        cycle.seed = cycle.seed.map(|seed| seed.wrapping_add(u64::from(id)));
        cycle
    }

    /// Length of the run.
    #[must_use]
    pub const fn run_duration(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }

    /// Pause between two crossings of the same vehicle.
    #[must_use]
    pub const fn vehicle_spacing(&self) -> Duration {
        Duration::from_millis(self.vehicle_spacing_ms)
    }
}
