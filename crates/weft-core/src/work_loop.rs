//! Cooperative work loop.
//!
//! A render pass is split into units of work, one fiber each. [`WorkLoop::tick`]
//! performs units until the slice deadline runs low, then hands control back.
//! When the last unit of a pass is done the whole tree is committed in one go
//! and becomes the current tree.

use std::rc::Rc;
use std::sync::Arc;

use crate::commit::{commit_root, update_host_properties, CommitSummary};
use crate::config::{RestartPolicy, SchedulerConfig};
use crate::element::{Element, ElementType, Props};
use crate::fiber::{Fiber, FiberArena, FiberId};
use crate::hooks::{HookScope, RenderSignal};
use crate::host::{Host, HostError, NodeId};
use crate::platform::{Deadline, IdleScheduler, ManualScheduler, Unbounded};
use crate::reconcile::reconcile_children;

/// Result of one [`WorkLoop::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Nothing to do.
    Idle,
    /// The slice ran out with work remaining.
    Yielded,
    /// A pass finished and was applied to the host.
    Committed(CommitSummary),
}

pub struct WorkLoop<H: Host> {
    host: H,
    fibers: FiberArena,
    current_root: Option<FiberId>,
    wip_root: Option<FiberId>,
    next_unit_of_work: Option<FiberId>,
    deletions: Vec<FiberId>,
    signal: Rc<RenderSignal>,
    config: SchedulerConfig,
    passes_committed: u64,
}

impl<H: Host> WorkLoop<H> {
    pub fn new(host: H) -> Self {
        Self::with_scheduler(host, Arc::new(ManualScheduler), SchedulerConfig::default())
    }

    pub fn with_scheduler(
        host: H,
        scheduler: Arc<dyn IdleScheduler>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            host,
            fibers: FiberArena::new(),
            current_root: None,
            wip_root: None,
            next_unit_of_work: None,
            deletions: Vec::new(),
            signal: Rc::new(RenderSignal::new(scheduler)),
            config,
            passes_committed: 0,
        }
    }

    /// Starts a pass that renders `element` into `container`.
    ///
    /// Completion is asynchronous: the pass advances on later ticks.
    pub fn render(&mut self, element: Element, container: NodeId) {
        let props = Rc::new(Props::new().with_children(vec![element]));
        self.begin_pass(container, props);
    }

    /// Performs units of work until `deadline` runs low, committing if the
    /// pass completes.
    pub fn tick(&mut self, deadline: &dyn Deadline) -> Result<TickStatus, HostError> {
        self.serve_render_request();

        let mut units = 0usize;
        while let Some(unit) = self.next_unit_of_work {
            self.next_unit_of_work = self.perform_unit_of_work(unit)?;
            units += 1;
            if self.should_yield(deadline, units) {
                break;
            }
        }

        let status = match (self.next_unit_of_work, self.wip_root) {
            (None, Some(_)) => TickStatus::Committed(self.commit()?),
            (Some(_), _) => TickStatus::Yielded,
            (None, None) => TickStatus::Idle,
        };
        log::trace!("tick performed {units} units: {status:?}");

        if self.has_pending_work() {
            self.signal.scheduler().request_idle_slice();
        }
        Ok(status)
    }

    /// Ticks with an unbounded deadline until no work is left.
    pub fn flush(&mut self) -> Result<Option<CommitSummary>, HostError> {
        let mut last_commit = None;
        while self.has_pending_work() {
            match self.tick(&Unbounded)? {
                TickStatus::Committed(summary) => last_commit = Some(summary),
                TickStatus::Yielded => {}
                TickStatus::Idle => {
                    if !self.has_pending_work() {
                        break;
                    }
                }
            }
        }
        Ok(last_commit)
    }

    pub fn has_pending_work(&self) -> bool {
        self.wip_root.is_some()
            || self.next_unit_of_work.is_some()
            || (self.signal.is_requested() && self.current_root.is_some())
    }

    fn should_yield(&self, deadline: &dyn Deadline, units: usize) -> bool {
        if self
            .config
            .max_units_per_tick
            .is_some_and(|max_units| units >= max_units)
        {
            return true;
        }
        deadline.time_remaining() < self.config.yield_threshold
    }

    fn serve_render_request(&mut self) {
        if !self.signal.take() {
            return;
        }
        let Some(current) = self.current_root else {
            // Nothing committed yet: the first pass has to land before a re-render.
            self.signal.defer();
            return;
        };
        if self.wip_root.is_some() && self.config.restart_policy == RestartPolicy::FinishInFlight {
            self.signal.defer();
            return;
        }
        let (container, props) = {
            let root = &self.fibers[current];
            (root.dom, root.props.clone())
        };
        match container {
            Some(container) => self.begin_pass(container, props),
            None => log::warn!("committed root lost its container; render request dropped"),
        }
    }

    fn begin_pass(&mut self, container: NodeId, props: Rc<Props>) {
        if let Some(abandoned) = self.wip_root.take() {
            let released = self.fibers.release_subtree(abandoned);
            log::debug!("discarding in-flight pass ({released} fibers)");
        }
        let root = self
            .fibers
            .insert(Fiber::root(container, props, self.current_root));
        self.wip_root = Some(root);
        self.next_unit_of_work = Some(root);
        self.deletions.clear();
        log::debug!("render pass started at container {container}");
        self.signal.scheduler().request_idle_slice();
    }

    /// Processes one fiber and returns the next one in pre-order.
    fn perform_unit_of_work(&mut self, id: FiberId) -> Result<Option<FiberId>, HostError> {
        log::trace!("unit of work {id:?}");
        match self.fibers[id].ty.clone() {
            Some(ElementType::Component(component)) => {
                let previous = self.fibers[id]
                    .alternate
                    .map(|alternate| self.fibers[alternate].hooks.clone())
                    .unwrap_or_default();
                let props = self.fibers[id].props.clone();
                let mut scope = HookScope::new(previous, Rc::clone(&self.signal));
                let child = component.call(&props, &mut scope);
                self.fibers[id].hooks = scope.finish();
                reconcile_children(&mut self.fibers, id, &[child], &mut self.deletions);
            }
            ty => {
                if self.fibers[id].dom.is_none() {
                    let dom = match &ty {
                        Some(ElementType::Text) => self.host.create_text_node()?,
                        Some(ElementType::Host(tag)) => self.host.create_node(tag)?,
                        _ => return Err(HostError::Detached),
                    };
                    let props = self.fibers[id].props.clone();
                    update_host_properties(&mut self.host, dom, &Props::default(), &props)?;
                    self.fibers[id].dom = Some(dom);
                }
                let props = self.fibers[id].props.clone();
                reconcile_children(&mut self.fibers, id, props.children(), &mut self.deletions);
            }
        }
        let root = self.wip_root.unwrap_or(id);
        Ok(self.fibers.next_in_preorder(id, root))
    }

    fn commit(&mut self) -> Result<CommitSummary, HostError> {
        let Some(wip_root) = self.wip_root else {
            return Ok(CommitSummary::default());
        };
        let deletions = std::mem::take(&mut self.deletions);
        let summary = commit_root(&mut self.host, &mut self.fibers, wip_root, &deletions)?;

        if let Some(previous) = self.current_root.replace(wip_root) {
            self.fibers.release_subtree(previous);
        }
        for id in self.fibers.subtree(wip_root) {
            self.fibers[id].alternate = None;
        }
        self.wip_root = None;
        self.passes_committed += 1;
        log::debug!(
            "committed pass {}: {} placements, {} updates, {} deletions",
            self.passes_committed,
            summary.placements,
            summary.updates,
            summary.deletions
        );
        Ok(summary)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn fibers(&self) -> &FiberArena {
        &self.fibers
    }

    pub fn current_root(&self) -> Option<FiberId> {
        self.current_root
    }

    pub fn work_in_progress_root(&self) -> Option<FiberId> {
        self.wip_root
    }

    pub fn next_unit_of_work(&self) -> Option<FiberId> {
        self.next_unit_of_work
    }

    /// Old fibers queued for removal by the pass in flight.
    pub fn deletions(&self) -> &[FiberId] {
        &self.deletions
    }

    pub fn passes_committed(&self) -> u64 {
        self.passes_committed
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "tests/work_loop_tests.rs"]
mod tests;
