//! Positional local-state cells for function components.
//!
//! Each component fiber owns an ordered list of [`Hook`]s. A hook is found again
//! on the next render by its index in the alternate fiber's list, so a component
//! must call its hooks in the same order every time.
//!
//! The update queue of a hook is shared with its successor across alternates.
//! Rendering folds every pending update into the new state without removing it;
//! the commit phase removes exactly the updates a committed render consumed.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::platform::IdleScheduler;

/// Pending change to a hook's state.
pub enum Update<T> {
    Replace(T),
    Apply(Rc<dyn Fn(&T) -> T>),
}

impl<T: Clone> Update<T> {
    fn apply(&self, state: T) -> T {
        match self {
            Update::Replace(value) => value.clone(),
            Update::Apply(f) => f(&state),
        }
    }
}

impl<T: Clone> Clone for Update<T> {
    fn clone(&self) -> Self {
        match self {
            Update::Replace(value) => Update::Replace(value.clone()),
            Update::Apply(f) => Update::Apply(Rc::clone(f)),
        }
    }
}

struct UpdateQueue<T> {
    pending: RefCell<VecDeque<Update<T>>>,
}

impl<T: Clone> UpdateQueue<T> {
    fn new() -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
        }
    }

    fn push(&self, update: Update<T>) {
        self.pending.borrow_mut().push_back(update);
    }

    /// Folds every pending update over `base`, in enqueue order.
    fn fold(&self, base: T) -> (T, usize) {
        // Cloned out so an update closure may enqueue without a borrow conflict.
        let updates: Vec<Update<T>> = self.pending.borrow().iter().cloned().collect();
        let count = updates.len();
        let state = updates
            .iter()
            .fold(base, |state, update| update.apply(state));
        (state, count)
    }
}

trait ErasedQueue {
    fn consume(&self, count: usize);
    fn len(&self) -> usize;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Clone + 'static> ErasedQueue for UpdateQueue<T> {
    fn consume(&self, count: usize) {
        let mut pending = self.pending.borrow_mut();
        let count = count.min(pending.len());
        pending.drain(..count);
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// One local-state cell bound to a component fiber by position.
#[derive(Clone)]
pub struct Hook {
    state: Rc<dyn Any>,
    queue: Rc<dyn ErasedQueue>,
    consumed: usize,
}

impl Hook {
    /// Current state, if it has type `T`.
    pub fn state<T: 'static>(&self) -> Option<&T> {
        self.state.downcast_ref::<T>()
    }

    /// Updates enqueued but not yet removed by a commit.
    pub fn pending_updates(&self) -> usize {
        self.queue.len()
    }

    /// Removes the updates this hook's render already folded into its state.
    pub(crate) fn commit(&self) {
        self.queue.consume(self.consumed);
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("pending", &self.queue.len())
            .field("consumed", &self.consumed)
            .finish()
    }
}

/// Shared flag raised when some state changed and a new pass is needed.
pub struct RenderSignal {
    requested: Cell<bool>,
    scheduler: Arc<dyn IdleScheduler>,
}

impl RenderSignal {
    pub fn new(scheduler: Arc<dyn IdleScheduler>) -> Self {
        Self {
            requested: Cell::new(false),
            scheduler,
        }
    }

    pub fn request(&self) {
        self.requested.set(true);
        self.scheduler.request_idle_slice();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    pub(crate) fn take(&self) -> bool {
        self.requested.replace(false)
    }

    /// Puts back a request that could not be served yet.
    pub(crate) fn defer(&self) {
        self.requested.set(true);
    }

    pub(crate) fn scheduler(&self) -> &Arc<dyn IdleScheduler> {
        &self.scheduler
    }
}

/// Setter returned by [`HookScope::use_local_state`].
///
/// Never changes state synchronously: the update is queued and becomes visible
/// after the next full reconciliation and commit.
pub struct SetState<T> {
    queue: Rc<UpdateQueue<T>>,
    signal: Rc<RenderSignal>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
            signal: Rc::clone(&self.signal),
        }
    }
}

impl<T: Clone + 'static> SetState<T> {
    pub fn set(&self, value: T) {
        self.enqueue(Update::Replace(value));
    }

    pub fn update(&self, f: impl Fn(&T) -> T + 'static) {
        self.enqueue(Update::Apply(Rc::new(f)));
    }

    pub fn enqueue(&self, update: Update<T>) {
        self.queue.push(update);
        self.signal.request();
    }
}

/// Render context handed to a function component.
///
/// Carries the hooks of the fiber's alternate and collects the hooks of the
/// fiber being rendered.
pub struct HookScope {
    previous: Vec<Hook>,
    hooks: Vec<Hook>,
    signal: Rc<RenderSignal>,
}

impl HookScope {
    pub fn new(previous: Vec<Hook>, signal: Rc<RenderSignal>) -> Self {
        Self {
            previous,
            hooks: Vec::new(),
            signal,
        }
    }

    /// Returns the current state of the next hook slot and its setter.
    ///
    /// # Panics
    /// Panics if the hook at this position held a different type on the
    /// previous render.
    pub fn use_local_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        let index = self.hooks.len();
        let (base, queue) = match self.previous.get(index) {
            Some(old) => {
                let base = Rc::clone(&old.state)
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("use_local_state: hook {index} changed type"));
                let queue = Rc::clone(&old.queue)
                    .into_any()
                    .downcast::<UpdateQueue<T>>()
                    .unwrap_or_else(|_| panic!("use_local_state: hook {index} changed type"));
                ((*base).clone(), queue)
            }
            None => (initial, Rc::new(UpdateQueue::new())),
        };
        let (state, consumed) = queue.fold(base);
        self.hooks.push(Hook {
            state: Rc::new(state.clone()),
            queue: queue.clone(),
            consumed,
        });
        let setter = SetState {
            queue,
            signal: Rc::clone(&self.signal),
        };
        (state, setter)
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Ends the render and returns the hooks for the rendered fiber.
    ///
    /// # Panics
    /// Panics if a re-render called fewer or more hooks than the previous one.
    pub fn finish(self) -> Vec<Hook> {
        if !self.previous.is_empty() && self.previous.len() != self.hooks.len() {
            panic!(
                "hook count changed between renders: {} before, {} now",
                self.previous.len(),
                self.hooks.len()
            );
        }
        self.hooks
    }
}

#[cfg(test)]
#[path = "tests/hooks_tests.rs"]
mod tests;
