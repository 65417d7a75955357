//! Work loop configuration.

use std::time::Duration;

/// What happens to an in-flight pass when a new render is requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Abandon the work-in-progress tree and restart from the committed root.
    ///
    /// The abandoned fibers are released, but host nodes the pass already
    /// created were never attached and are not freed through the [`crate::Host`]
    /// API; a host that owns node storage keeps them.
    #[default]
    DiscardInFlight,
    /// Let the in-flight pass commit, then start the requested pass.
    FinishInFlight,
}

/// Configuration for a [`crate::WorkLoop`].
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// The loop yields once the slice has less than this much time left.
    pub yield_threshold: Duration,
    pub restart_policy: RestartPolicy,
    /// Hard cap on units of work per tick, independent of the deadline.
    pub max_units_per_tick: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            yield_threshold: Duration::from_millis(1),
            restart_policy: RestartPolicy::default(),
            max_units_per_tick: None,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    pub fn with_max_units_per_tick(mut self, max_units: usize) -> Self {
        self.max_units_per_tick = Some(max_units);
        self
    }
}
