//! # Simulation Error Types

use signal_core::{ConfigError, CyclerError};
use thiserror::Error;

/// Errors that can occur while setting up or running a simulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {reason}")]
    Io {
        /// Path that was read.
        path: String,
        /// OS error message.
        reason: String,
    },

    /// A simulation setting is out of range.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    /// Light timing was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A traffic light failed.
    #[error(transparent)]
    Cycler(#[from] CyclerError),

    /// A vehicle thread could not be spawned.
    #[error("failed to spawn vehicle thread: {0}")]
    Spawn(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
