use std::sync::Arc;

use weft_core::element::NODE_VALUE_KEY;
use weft_core::{
    Element, HostError, HostNodeKind, HostOp, ManualScheduler, MemoryHost, NodeId,
    SchedulerConfig, TickStatus, Unbounded, WorkLoop,
};

use crate::StepDeadline;

const MAX_PUMP_TICKS: usize = 100;

/// Headless harness for exercising render passes in tests.
///
/// `FiberTestRule` owns a work loop over an in-memory host with a single
/// container node. It exposes helpers for installing content, driving passes
/// either to completion or a few units at a time, and inspecting the host tree.
pub struct FiberTestRule {
    work_loop: WorkLoop<MemoryHost>,
    container: NodeId,
    content: Option<Element>,
}

impl FiberTestRule {
    /// Create a new test rule backed by the default in-memory host.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let mut host = MemoryHost::new();
        let container = host.create_container();
        Self {
            work_loop: WorkLoop::with_scheduler(host, Arc::new(ManualScheduler), config),
            container,
            content: None,
        }
    }

    /// Install `content` into the container and run the first pass to commit.
    pub fn set_content(&mut self, content: Element) -> Result<(), HostError> {
        self.content = Some(content);
        self.render();
        self.pump_until_idle().map(|_| ())
    }

    /// Start a pass for the installed content without running it.
    pub fn render(&mut self) {
        if let Some(content) = self.content.clone() {
            self.work_loop.render(content, self.container);
        }
    }

    /// Render the installed content again and run the pass to commit.
    pub fn rerender(&mut self) -> Result<usize, HostError> {
        self.render();
        self.pump_until_idle()
    }

    /// Tick until no pass is in flight or requested. Returns the number of
    /// passes committed.
    ///
    /// # Panics
    /// Panics if work is still pending after a bounded number of ticks, which
    /// usually means a component requests a render on every render.
    pub fn pump_until_idle(&mut self) -> Result<usize, HostError> {
        let mut committed = 0;
        let mut ticks = 0;
        while self.work_loop.has_pending_work() {
            ticks += 1;
            if ticks > MAX_PUMP_TICKS {
                panic!("pump_until_idle: still busy after {MAX_PUMP_TICKS} ticks");
            }
            if let TickStatus::Committed(_) = self.work_loop.tick(&Unbounded)? {
                committed += 1;
            }
        }
        Ok(committed)
    }

    /// Run a single tick that stops after `units` units of work.
    pub fn tick_units(&mut self, units: usize) -> Result<TickStatus, HostError> {
        self.work_loop.tick(&StepDeadline::new(units))
    }

    /// Dispatch `event` on `node`. Returns how many listeners ran.
    pub fn dispatch(&self, node: NodeId, event: &str) -> Result<usize, HostError> {
        self.work_loop.host().dispatch_event(node, event)
    }

    /// First element whose direct text child reads `text`, in tree order.
    pub fn find_by_text(&self, text: &str) -> Option<NodeId> {
        self.find_in(self.container, text)
    }

    fn find_in(&self, id: NodeId, text: &str) -> Option<NodeId> {
        let host = self.work_loop.host();
        let children = host.children(id).ok()?;
        for &child in children {
            let Ok(node) = host.node(child) else {
                continue;
            };
            let matches = *node.kind() == HostNodeKind::Text
                && host
                    .property(child, NODE_VALUE_KEY)
                    .and_then(|value| value.as_text())
                    == Some(text);
            if matches {
                return Some(id);
            }
            if let Some(found) = self.find_in(child, text) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of everything rendered into the container.
    pub fn text_content(&self) -> String {
        self.work_loop.host().text_content(self.container)
    }

    /// Dump the current host tree as text for debugging.
    pub fn dump_tree(&self) -> String {
        self.work_loop.host().dump_tree(self.container)
    }

    /// Host operations recorded since the last call.
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        self.work_loop.host_mut().take_ops()
    }

    pub fn host(&self) -> &MemoryHost {
        self.work_loop.host()
    }

    pub fn host_mut(&mut self) -> &mut MemoryHost {
        self.work_loop.host_mut()
    }

    /// Returns whether content has been installed in this rule.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Gain access to the raw work loop for advanced scenarios.
    pub fn work_loop(&mut self) -> &mut WorkLoop<MemoryHost> {
        &mut self.work_loop
    }
}

impl Default for FiberTestRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// `FiberTestRule`.
pub fn run_test_render<R>(f: impl FnOnce(&mut FiberTestRule) -> R) -> R {
    let mut rule = FiberTestRule::new();
    f(&mut rule)
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod scenario_tests;
