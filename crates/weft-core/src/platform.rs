//! Platform abstraction traits for the fiber runtime.
//!
//! The work loop never sleeps or spawns on its own. The host platform decides
//! when to hand it a slice of idle time and how long that slice lasts.

use std::cell::Cell;
use std::time::Duration;

/// Hands idle time slices to the work loop.
///
/// Implementations arrange for the work loop to be ticked again soon. They must
/// be safe to use from multiple threads.
pub trait IdleScheduler: Send + Sync {
    /// Request that the host schedule another idle slice.
    fn request_idle_slice(&self);
}

/// Budget of the slice currently being worked on.
pub trait Deadline {
    /// Time left before the work loop should give control back to the host.
    fn time_remaining(&self) -> Duration;
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the time elapsed since `since`.
    fn elapsed(&self, since: Self::Instant) -> Duration;
}

/// Scheduler that ignores slice requests; the caller ticks manually.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualScheduler;

impl IdleScheduler for ManualScheduler {
    fn request_idle_slice(&self) {}
}

/// Deadline that never runs out.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// Deadline that expires after a fixed number of units of work.
///
/// The work loop asks for the remaining time once after every unit, so
/// `StepDeadline::new(3)` lets exactly three units run before the loop yields.
/// Used to drive passes deterministically in tests.
#[derive(Debug)]
pub struct StepDeadline {
    remaining: Cell<usize>,
}

impl StepDeadline {
    pub fn new(units: usize) -> Self {
        Self {
            remaining: Cell::new(units),
        }
    }

    /// Queries left before the deadline reports zero.
    pub fn remaining_units(&self) -> usize {
        self.remaining.get()
    }
}

impl Deadline for StepDeadline {
    fn time_remaining(&self) -> Duration {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1)
        }
    }
}
