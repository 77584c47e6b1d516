//! # Signal Simulation
//!
//! Drives `signal_core` traffic lights the way a traffic simulation would:
//! several intersections, vehicles that block until their light turns green,
//! and a driver that owns every background thread and shuts them all down.
//!
//! ## Example
//!
//! ```rust,no_run
//! use signal_sim::{SimConfig, Simulation};
//!
//! let report = Simulation::new(SimConfig::quick())?.run()?;
//! println!("{report}");
//! # Ok::<(), signal_sim::SimError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod intersection;
pub mod logging;
pub mod simulation;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use intersection::Intersection;
pub use logging::init_logging;
pub use simulation::{CrossingEvent, IntersectionReport, SimReport, Simulation};
