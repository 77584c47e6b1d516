//! # Signal Core Error Types
//!
//! All errors that can occur in the mailbox and the phase cycler.

use thiserror::Error;

/// Errors returned by [`Mailbox`](crate::sync::Mailbox) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// The mailbox was closed and holds no more messages.
    #[error("mailbox closed")]
    Closed,

    /// No message arrived before the deadline.
    #[error("timed out waiting for a message")]
    Timeout,
}

/// Errors in cycle timing configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The cycle range is empty or starts at zero.
    #[error("invalid cycle range: min {min} ms, max {max} ms (need 0 < min < max)")]
    InvalidRange {
        /// Lower bound in milliseconds (inclusive).
        min: u64,
        /// Upper bound in milliseconds (exclusive).
        max: u64,
    },

    /// The background task would spin without sleeping.
    #[error("poll interval must be at least 1 ms")]
    ZeroPollInterval,

    /// The TOML document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Errors returned by [`PhaseCycler`](crate::light::PhaseCycler) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CyclerError {
    /// `simulate()` was called on a light that is already cycling.
    #[error("traffic light {0} is already cycling")]
    AlreadyStarted(u32),

    /// The light was stopped while a caller was waiting on it.
    #[error("traffic light {0} was stopped")]
    Stopped(u32),

    /// No green phase was observed before the deadline.
    #[error("timed out waiting for traffic light {0} to turn green")]
    Timeout(u32),

    /// The background thread could not be spawned.
    #[error("failed to spawn cycle thread: {0}")]
    Spawn(String),

    /// The background thread panicked.
    #[error("cycle thread of traffic light {0} panicked")]
    TaskPanicked(u32),

    /// The timing configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for mailbox operations.
pub type MailboxResult<T> = Result<T, MailboxError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for cycler operations.
pub type CyclerResult<T> = Result<T, CyclerError>;
