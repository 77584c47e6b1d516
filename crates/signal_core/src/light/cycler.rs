//! # Phase Cycler
//!
//! A traffic light that flips between red and green on its own thread and
//! publishes every flip into a [`Mailbox`].
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────── PhaseCycler ────────────────────────┐
//!   │                                                             │
//!   │  phase-cycler-N thread            Mailbox<Phase>            │
//!   │  ┌─────────────────────┐  send   ┌──────────────┐  receive  │──> wait_for_green()
//!   │  │ poll every 1 ms     │ ──────> │ LIFO, condvar │ ───────> │──> wait_for_green()
//!   │  │ toggle after 4-7 s  │         └──────────────┘           │
//!   │  └─────────┬───────────┘                                    │
//!   │            └──> current_phase (AtomicU8) ──────────────────>│──> current_phase()
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! 1. [`PhaseCycler::new`]: phase is `Red`, no thread yet.
//! 2. [`PhaseCycler::simulate`]: spawns the thread, returns a [`CyclerHandle`].
//!    A second call fails with [`CyclerError::AlreadyStarted`].
//! 3. [`CyclerHandle::stop`] / drop: stop flag + mailbox close. Blocked
//!    `wait_for_green` callers return [`CyclerError::Stopped`].
//!
//! ## Known Limitation
//!
//! Every `wait_for_green` call consumes mailbox entries. Several concurrent
//! waiters on one light race for the same entries, and with LIFO pops one of
//! them can keep missing greens. Serialize waiters per light if that matters.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::CycleConfig;
use crate::error::{CyclerError, CyclerResult, MailboxError, MailboxResult};
use crate::light::phase::Phase;
use crate::light::schedule::CycleSchedule;
use crate::sync::{Mailbox, ReceiveOrder};

/// Counters for one traffic light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CyclerStats {
    /// Total phase changes.
    pub toggles: u64,
    /// Changes to green.
    pub greens: u64,
    /// Changes to red.
    pub reds: u64,
}

/// A traffic light state machine with a background toggling task.
///
/// ## Usage
///
/// ```rust,no_run
/// use signal_core::{CycleConfig, PhaseCycler};
///
/// let light = PhaseCycler::new(1, CycleConfig::default())?;
/// let handle = light.simulate()?;
///
/// light.wait_for_green()?; // blocks 4-7 s
/// println!("light is {}", light.current_phase());
///
/// handle.join()?;
/// # Ok::<(), signal_core::CyclerError>(())
/// ```
pub struct PhaseCycler {
    /// Light identifier (thread name, logs, errors).
    id: u32,
    /// Timing.
    config: CycleConfig,
    /// Last applied phase. Written only by the cycle thread.
    current_phase: AtomicU8,
    /// Published phases.
    mailbox: Mailbox<Phase>,
    /// Set by the first `simulate()`.
    started: AtomicBool,
    /// Checked by the cycle thread every poll.
    stop_requested: AtomicBool,
    /// Total toggles.
    toggles: AtomicU64,
    /// Toggles to green.
    greens: AtomicU64,
}

impl PhaseCycler {
    /// Creates a red traffic light. Nothing runs until [`simulate`](Self::simulate).
    ///
    /// # Errors
    ///
    /// Returns [`CyclerError::Config`] if `config` fails validation.
    pub fn new(id: u32, config: CycleConfig) -> CyclerResult<Arc<Self>> {
        config.validate()?;
        let mailbox = Mailbox::with_options(ReceiveOrder::Lifo, config.send_delay());

        Ok(Arc::new(Self {
            id,
            config,
            current_phase: AtomicU8::new(Phase::Red.into()),
            mailbox,
            started: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            toggles: AtomicU64::new(0),
            greens: AtomicU64::new(0),
        }))
    }

    /// Returns the light identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the timing configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Returns the last phase applied by the cycle thread.
    ///
    /// Snapshot read, eventually consistent: a phase may already be applied
    /// here while still sitting unread in the mailbox, and vice versa for a
    /// reader racing the toggle.
    #[inline]
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        Phase::from(self.current_phase.load(Ordering::Acquire))
    }

    /// Returns the mailbox the cycle thread publishes into.
    #[inline]
    #[must_use]
    pub const fn mailbox(&self) -> &Mailbox<Phase> {
        &self.mailbox
    }

    /// Returns true while the cycle thread is meant to be running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire) && !self.stop_requested.load(Ordering::Acquire)
    }

    /// Returns toggle counters.
    #[must_use]
    pub fn stats(&self) -> CyclerStats {
        let toggles = self.toggles.load(Ordering::Acquire);
        let greens = self.greens.load(Ordering::Acquire);
        CyclerStats {
            toggles,
            greens,
            reds: toggles.saturating_sub(greens),
        }
    }

    /// Starts the background cycle thread.
    ///
    /// Does not block. The thread runs until the returned handle is stopped
    /// or dropped.
    ///
    /// # Errors
    ///
    /// - [`CyclerError::AlreadyStarted`] if called more than once.
    /// - [`CyclerError::Config`] if the schedule cannot be built.
    /// - [`CyclerError::Spawn`] if the OS refuses a new thread.
    pub fn simulate(self: &Arc<Self>) -> CyclerResult<CyclerHandle> {
        if self.started.swap(true, Ordering::AcqRel) {
            tracing::warn!(light = self.id, "simulate() called on a light that is already cycling");
            return Err(CyclerError::AlreadyStarted(self.id));
        }

        let schedule = CycleSchedule::from_config(&self.config)?;
        let cycler = Arc::clone(self);

        let thread = thread::Builder::new()
            .name(format!("phase-cycler-{}", self.id))
            .spawn(move || cycler.cycle_through_phases(schedule))
            .map_err(|e| {
                self.started.store(false, Ordering::Release);
                CyclerError::Spawn(e.to_string())
            })?;

        tracing::info!(
            light = self.id,
            min_ms = self.config.min_cycle_ms,
            max_ms = self.config.max_cycle_ms,
            "traffic light started cycling"
        );

        Ok(CyclerHandle {
            cycler: Arc::clone(self),
            thread: Some(thread),
        })
    }

    /// Cycle thread main loop.
    fn cycle_through_phases(&self, mut schedule: CycleSchedule) {
        let poll = self.config.poll_interval();
        let mut cycle_duration = schedule.next_duration();
        let mut last_toggle = Instant::now();

        while !self.stop_requested.load(Ordering::Acquire) {
            if last_toggle.elapsed() >= cycle_duration {
                let Ok(phase) = self.toggle() else {
                    // Closed underneath us: shutting down
                    break;
                };
                tracing::info!(light = self.id, %phase, "traffic light turned {phase}");

                last_toggle = Instant::now();
                cycle_duration = schedule.next_duration();
            }

            thread::sleep(poll);
        }

        tracing::debug!(light = self.id, toggles = self.stats().toggles, "cycle thread exiting");
    }

    /// Publishes the opposite phase, then applies it.
    ///
    /// A closed mailbox leaves the phase and counters untouched.
    fn toggle(&self) -> MailboxResult<Phase> {
        let next = self.current_phase().toggled();
        self.mailbox.send(next)?;
        self.current_phase.store(next.into(), Ordering::Release);
        self.toggles.fetch_add(1, Ordering::AcqRel);
        if next.is_green() {
            self.greens.fetch_add(1, Ordering::AcqRel);
        }
        Ok(next)
    }

    /// Blocks until a green phase is received from the mailbox.
    ///
    /// Red phases are consumed and discarded.
    ///
    /// # Errors
    ///
    /// Returns [`CyclerError::Stopped`] if the light is stopped while waiting.
    pub fn wait_for_green(&self) -> CyclerResult<()> {
        loop {
            match self.mailbox.receive() {
                Ok(Phase::Green) => return Ok(()),
                Ok(Phase::Red) => {}
                Err(_) => return Err(CyclerError::Stopped(self.id)),
            }
        }
    }

    /// Like [`wait_for_green`](Self::wait_for_green) with an overall deadline.
    ///
    /// # Errors
    ///
    /// Returns [`CyclerError::Timeout`] if no green arrived in time, or
    /// [`CyclerError::Stopped`] if the light is stopped while waiting.
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> CyclerResult<()> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for_green();
        };

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.mailbox.receive_timeout(remaining) {
                Ok(Phase::Green) => return Ok(()),
                Ok(Phase::Red) => {}
                Err(MailboxError::Timeout) => return Err(CyclerError::Timeout(self.id)),
                Err(MailboxError::Closed) => return Err(CyclerError::Stopped(self.id)),
            }
        }
    }

    /// Asks the cycle thread to exit and wakes every waiter.
    fn request_stop(&self) {
        if !self.stop_requested.swap(true, Ordering::AcqRel) {
            tracing::info!(light = self.id, "traffic light stopping");
        }
        self.mailbox.close();
    }
}

impl std::fmt::Debug for PhaseCycler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseCycler")
            .field("id", &self.id)
            .field("phase", &self.current_phase())
            .field("running", &self.is_running())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Owner of a running cycle thread.
///
/// Keep it for as long as the light should cycle. Stopping or dropping it
/// ends the thread and wakes blocked waiters.
#[must_use = "dropping a CyclerHandle stops the traffic light"]
pub struct CyclerHandle {
    cycler: Arc<PhaseCycler>,
    thread: Option<JoinHandle<()>>,
}

impl CyclerHandle {
    /// Returns the light this handle drives.
    #[inline]
    #[must_use]
    pub const fn cycler(&self) -> &Arc<PhaseCycler> {
        &self.cycler
    }

    /// Requests the cycle thread to stop. Returns immediately.
    pub fn stop(&self) {
        self.cycler.request_stop();
    }

    /// Returns true once the cycle thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stops the cycle thread and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`CyclerError::TaskPanicked`] if the thread panicked.
    pub fn join(mut self) -> CyclerResult<()> {
        self.stop();
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| CyclerError::TaskPanicked(self.cycler.id)),
            None => Ok(()),
        }
    }
}

impl Drop for CyclerHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl std::fmt::Debug for CyclerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyclerHandle")
            .field("light", &self.cycler.id)
            .field("finished", &self.is_finished())
            .finish()
    }
}
