//! # Synchronization Primitives
//!
//! ## The Problem
//!
//! ```text
//! Thread 1 (Light):    produces a phase every few seconds
//! Thread 2..N (Cars):  need the latest phase, and nothing to do until then
//!
//! Shared variable + polling:  burns a core per waiting car
//! ```
//!
//! ## The Solution: A Blocking Mailbox
//!
//! Producers move values in under a short lock. Consumers sleep on a
//! condition variable and are woken exactly when there is something to take.

mod mailbox;

pub use mailbox::{Mailbox, ReceiveOrder};
