//! # Signal Core
//!
//! A blocking mailbox and a traffic light that publishes its phase changes
//! through it.
//!
//! - 1 background thread per light, polling every millisecond
//! - 0 polling on the consumer side: waiters sleep on a condvar
//! - Explicit ownership of every background thread via [`CyclerHandle`]
//!
//! ## Architecture Rules
//!
//! 1. **Short critical sections** - The mailbox lock is never held across a
//!    wait or a sleep
//! 2. **Latest phase wins** - Receivers pop the newest message first
//! 3. **No orphan threads** - Dropping a handle stops and joins its thread
//!
//! ## Example
//!
//! ```rust,no_run
//! use signal_core::{CycleConfig, PhaseCycler};
//!
//! let light = PhaseCycler::new(0, CycleConfig::default())?;
//! let handle = light.simulate()?;
//!
//! light.wait_for_green()?;
//! println!("light is {}", light.current_phase());
//!
//! handle.join()?;
//! # Ok::<(), signal_core::CyclerError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod light;
pub mod sync;

pub use config::CycleConfig;
pub use error::{
    ConfigError, ConfigResult, CyclerError, CyclerResult, MailboxError, MailboxResult,
};
pub use light::{CycleSchedule, CyclerHandle, CyclerStats, Phase, PhaseCycler};
pub use sync::{Mailbox, ReceiveOrder};
