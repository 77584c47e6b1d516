//! # Traffic Light
//!
//! A two-phase light that cycles on its own thread.
//!
//! ## Submodules
//!
//! - `phase`: the `Red` / `Green` value type
//! - `schedule`: seeded random cycle durations
//! - `cycler`: the state machine, its background thread, and the consumer wait

mod cycler;
mod phase;
mod schedule;

pub use cycler::{CyclerHandle, CyclerStats, PhaseCycler};
pub use phase::Phase;
pub use schedule::CycleSchedule;
