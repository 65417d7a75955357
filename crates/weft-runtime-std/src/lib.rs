//! Standard runtime services backed by Rust's `std` library.
//!
//! This crate provides concrete implementations of the platform
//! abstraction traits defined in `weft-core`. Applications construct a
//! [`StdRuntime`], build their [`WorkLoop`] through it and let
//! [`StdRuntime::run_until_idle`] hand out time slices.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use weft_core::{Clock, Deadline, Host, HostError, IdleScheduler, SchedulerConfig, WorkLoop};

type Waker = Arc<dyn Fn() + Send + Sync + 'static>;

/// Idle scheduler that records slice requests in an atomic flag.
pub struct StdIdleScheduler {
    slice_requested: AtomicBool,
    waker: RwLock<Option<Waker>>,
}

impl StdIdleScheduler {
    pub fn new() -> Self {
        Self {
            slice_requested: AtomicBool::new(false),
            waker: RwLock::new(None),
        }
    }

    /// Returns whether a slice has been requested since the last call.
    pub fn take_slice_request(&self) -> bool {
        self.slice_requested.swap(false, Ordering::SeqCst)
    }

    /// Registers a waker that will be invoked whenever a new slice is requested.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(waker));
    }

    /// Clears any registered waker.
    pub fn clear_waker(&self) {
        *self.waker.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn wake(&self) {
        let waker = self
            .waker
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Default for StdIdleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdIdleScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdIdleScheduler")
            .field(
                "slice_requested",
                &self.slice_requested.load(Ordering::SeqCst),
            )
            .finish()
    }
}

impl IdleScheduler for StdIdleScheduler {
    fn request_idle_slice(&self) {
        self.slice_requested.store(true, Ordering::SeqCst);
        self.wake();
    }
}

/// Clock implementation backed by [`std::time`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed(&self, since: Self::Instant) -> Duration {
        since.elapsed()
    }
}

/// Deadline for a slice of fixed length measured on `clock`.
pub struct SliceDeadline<'a, C: Clock> {
    clock: &'a C,
    started: C::Instant,
    budget: Duration,
}

impl<'a, C: Clock> SliceDeadline<'a, C> {
    /// Opens a slice of `budget` starting now.
    pub fn start(clock: &'a C, budget: Duration) -> Self {
        Self {
            clock,
            started: clock.now(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl<C: Clock> Deadline for SliceDeadline<'_, C> {
    fn time_remaining(&self) -> Duration {
        self.budget
            .saturating_sub(self.clock.elapsed(self.started))
    }
}

/// Settings for a [`StdRuntime`].
#[derive(Clone, Debug)]
pub struct RuntimeSettings {
    /// Length of each idle slice handed to the work loop.
    pub slice_budget: Duration,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            slice_budget: Duration::from_millis(16),
        }
    }
}

impl RuntimeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slice_budget(mut self, budget: Duration) -> Self {
        self.slice_budget = budget;
        self
    }
}

/// Convenience container bundling the standard scheduler and clock.
#[derive(Clone)]
pub struct StdRuntime {
    scheduler: Arc<StdIdleScheduler>,
    clock: StdClock,
    settings: RuntimeSettings,
}

impl StdRuntime {
    /// Creates a new standard runtime instance.
    pub fn new() -> Self {
        Self::with_settings(RuntimeSettings::default())
    }

    pub fn with_settings(settings: RuntimeSettings) -> Self {
        Self {
            scheduler: Arc::new(StdIdleScheduler::default()),
            clock: StdClock,
            settings,
        }
    }

    /// Builds a work loop whose slice requests go to this runtime's scheduler.
    pub fn work_loop<H: Host>(&self, host: H, config: SchedulerConfig) -> WorkLoop<H> {
        let scheduler: Arc<dyn IdleScheduler> = self.scheduler.clone();
        WorkLoop::with_scheduler(host, scheduler, config)
    }

    /// Returns the scheduler implementation.
    pub fn scheduler(&self) -> Arc<StdIdleScheduler> {
        Arc::clone(&self.scheduler)
    }

    /// Returns the clock implementation.
    pub fn clock(&self) -> StdClock {
        self.clock
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Returns whether a slice was requested since the last poll.
    pub fn take_slice_request(&self) -> bool {
        self.scheduler.take_slice_request()
    }

    /// Registers a waker to be called when the work loop requests a slice.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.scheduler.set_waker(waker);
    }

    /// Clears any previously registered waker.
    pub fn clear_waker(&self) {
        self.scheduler.clear_waker();
    }

    /// Opens a slice of the configured budget.
    pub fn open_slice(&self) -> SliceDeadline<'_, StdClock> {
        SliceDeadline::start(&self.clock, self.settings.slice_budget)
    }

    /// Hands slices to `work_loop` until it has no work left and no slice is
    /// outstanding. Returns the number of passes committed meanwhile.
    pub fn run_until_idle<H: Host>(&self, work_loop: &mut WorkLoop<H>) -> Result<u64, HostError> {
        let committed_before = work_loop.passes_committed();
        let mut slices = 0u64;
        loop {
            let requested = self.take_slice_request();
            if !requested && !work_loop.has_pending_work() {
                break;
            }
            let deadline = self.open_slice();
            work_loop.tick(&deadline)?;
            slices += 1;
        }
        let committed = work_loop.passes_committed() - committed_before;
        log::debug!("idle after {slices} slices, {committed} passes committed");
        Ok(committed)
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/std_runtime_tests.rs"]
mod tests;
