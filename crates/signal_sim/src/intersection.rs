//! # Intersection
//!
//! One traffic light plus a single-file lane. Only the vehicle at the head
//! of the lane waits on the light, so waiters never compete for the same
//! mailbox entries.

use parking_lot::Mutex;
use signal_core::{CycleConfig, CyclerHandle, PhaseCycler};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::SimResult;

/// An intersection guarded by one traffic light.
#[derive(Debug)]
pub struct Intersection {
    id: u32,
    light: Arc<PhaseCycler>,
    /// Head-of-lane token.
    lane: Mutex<()>,
    crossings: AtomicU64,
}

impl Intersection {
    /// Creates an intersection with a red light.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Cycler`](crate::SimError::Cycler) if the timing is invalid.
    pub fn new(id: u32, cycle: CycleConfig) -> SimResult<Self> {
        Ok(Self {
            id,
            light: PhaseCycler::new(id, cycle)?,
            lane: Mutex::new(()),
            crossings: AtomicU64::new(0),
        })
    }

    /// Intersection identifier (same as its light).
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// The traffic light.
    #[inline]
    #[must_use]
    pub const fn light(&self) -> &Arc<PhaseCycler> {
        &self.light
    }

    /// Vehicles that have crossed so far.
    #[must_use]
    pub fn crossings(&self) -> u64 {
        self.crossings.load(Ordering::Relaxed)
    }

    /// Starts the light.
    ///
    /// # Errors
    ///
    /// Propagates [`PhaseCycler::simulate`] errors.
    pub fn start(&self) -> SimResult<CyclerHandle> {
        Ok(self.light.simulate()?)
    }

    /// Queues `vehicle` in the lane and blocks until it may cross.
    ///
    /// Returns the time spent queued plus waiting for green.
    ///
    /// # Errors
    ///
    /// Returns [`CyclerError::Stopped`](signal_core::CyclerError::Stopped)
    /// (wrapped) once the light has been stopped.
    pub fn cross(&self, vehicle: u32) -> SimResult<Duration> {
        let arrived = Instant::now();
        let _head_of_lane = self.lane.lock();

        tracing::debug!(intersection = self.id, vehicle, "vehicle waiting for green");
        self.light.wait_for_green()?;

        self.crossings.fetch_add(1, Ordering::Relaxed);
        let waited = arrived.elapsed();
        tracing::debug!(intersection = self.id, vehicle, ?waited, "vehicle crossed");
        Ok(waited)
    }
}
