//! # Blocking Mailbox
//!
//! Ownership handoff of single values between threads.
//!
//! ## Architecture
//!
//! ```text
//!   Producer 1 ──┐                                  ┌──> Consumer 1
//!   Producer 2 ──┼──> [Mutex<VecDeque<T>> + Condvar] ┼──> Consumer 2
//!   Producer N ──┘        (unbounded, LIFO pop)      └──> Consumer N
//! ```
//!
//! `send` never blocks on capacity. `receive` parks the caller on a condvar
//! until a message is available; no polling.
//!
//! ## Receive Order
//!
//! By default the most recently sent message is received first
//! ([`ReceiveOrder::Lifo`]). Consumers of a traffic light only care about
//! the latest phase, so a slow reader skips stale entries instead of
//! replaying history. [`ReceiveOrder::Fifo`] is available for consumers that
//! need every message in send order.
//!
//! ## Shutdown
//!
//! [`Mailbox::close`] wakes every blocked receiver. Receivers drain what is
//! left, then get [`MailboxError::Closed`].

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{MailboxError, MailboxResult};

/// Which end of the queue `receive` takes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReceiveOrder {
    /// Newest message first (stack order).
    #[default]
    Lifo,
    /// Oldest message first (queue order).
    Fifo,
}

/// State guarded by the mailbox lock.
struct MailboxState<T> {
    messages: VecDeque<T>,
    closed: bool,
}

impl<T> MailboxState<T> {
    fn pop(&mut self, order: ReceiveOrder) -> Option<T> {
        match order {
            ReceiveOrder::Lifo => self.messages.pop_back(),
            ReceiveOrder::Fifo => self.messages.pop_front(),
        }
    }
}

/// Thread-safe, unbounded, blocking message queue.
///
/// ## Usage
///
/// ```rust
/// use signal_core::Mailbox;
/// use std::sync::Arc;
/// use std::thread;
///
/// let mailbox = Arc::new(Mailbox::new());
///
/// let producer = Arc::clone(&mailbox);
/// thread::spawn(move || {
///     producer.send(42).unwrap();
/// });
///
/// // Blocks until the producer has sent
/// assert_eq!(mailbox.receive(), Ok(42));
/// ```
pub struct Mailbox<T> {
    /// Messages plus closed flag.
    state: Mutex<MailboxState<T>>,
    /// Signalled on every send (one waiter) and on close (all waiters).
    not_empty: Condvar,
    /// Pop order.
    order: ReceiveOrder,
    /// Fixed production cost paid before taking the lock.
    send_delay: Duration,
}

impl<T> Mailbox<T> {
    /// Creates an empty LIFO mailbox with no send delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ReceiveOrder::Lifo, Duration::ZERO)
    }

    /// Creates an empty mailbox with the given pop order.
    #[must_use]
    pub fn with_order(order: ReceiveOrder) -> Self {
        Self::with_options(order, Duration::ZERO)
    }

    /// Creates an empty mailbox with an explicit order and send delay.
    ///
    /// The delay is slept by every `send` before the lock is taken, so it
    /// never holds up receivers.
    #[must_use]
    pub fn with_options(order: ReceiveOrder, send_delay: Duration) -> Self {
        Self {
            state: Mutex::new(MailboxState {
                messages: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
            order,
            send_delay,
        }
    }

    /// Moves `message` into the mailbox and wakes one waiting receiver.
    ///
    /// Never blocks on capacity.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Closed`] if the mailbox has been closed. The
    /// message is dropped in that case.
    pub fn send(&self, message: T) -> MailboxResult<()> {
        if !self.send_delay.is_zero() {
            thread::sleep(self.send_delay);
        }

        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(MailboxError::Closed);
            }
            state.messages.push_back(message);
        }

        self.not_empty.notify_one();
        Ok(())
    }

    /// Blocks until a message is available, then moves it out.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Closed`] once the mailbox is closed and
    /// drained.
    pub fn receive(&self) -> MailboxResult<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(message) = state.pop(self.order) {
                return Ok(message);
            }
            if state.closed {
                return Err(MailboxError::Closed);
            }
            // Re-checked on wake: spurious wakeups and competing receivers
            self.not_empty.wait(&mut state);
        }
    }

    /// Like [`receive`](Self::receive), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Timeout`] if nothing arrived in time, or
    /// [`MailboxError::Closed`] once the mailbox is closed and drained.
    pub fn receive_timeout(&self, timeout: Duration) -> MailboxResult<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.receive();
        };

        let mut state = self.state.lock();
        loop {
            if let Some(message) = state.pop(self.order) {
                return Ok(message);
            }
            if state.closed {
                return Err(MailboxError::Closed);
            }
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                return match state.pop(self.order) {
                    Some(message) => Ok(message),
                    None if state.closed => Err(MailboxError::Closed),
                    None => Err(MailboxError::Timeout),
                };
            }
        }
    }

    /// Takes a message if one is immediately available.
    pub fn try_receive(&self) -> Option<T> {
        self.state.lock().pop(self.order)
    }

    /// Closes the mailbox and wakes every blocked receiver.
    ///
    /// Messages already queued can still be received. Idempotent.
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        self.not_empty.notify_all();
        tracing::debug!("mailbox closed");
    }

    /// Returns whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    /// Returns true if no message is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().messages.is_empty()
    }

    /// Returns the pop order.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> ReceiveOrder {
        self.order
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Mailbox")
            .field("len", &state.messages.len())
            .field("closed", &state.closed)
            .field("order", &self.order)
            .field("send_delay", &self.send_delay)
            .finish()
    }
}
