//! Core of the weft fiber reconciler.
//!
//! Elements describe the desired UI. A [`WorkLoop`] turns them into fibers one
//! unit of work at a time, diffs each fiber's children against the previously
//! committed tree, and finally applies the queued mutations to a [`Host`] in a
//! single uninterrupted commit.

pub mod collections;
pub mod commit;
pub mod config;
pub mod element;
pub mod fiber;
pub mod hooks;
pub mod host;
pub mod platform;
pub mod reconcile;
pub mod work_loop;

pub use commit::{update_host_properties, CommitSummary};
pub use config::{RestartPolicy, SchedulerConfig};
pub use element::{
    create_element, create_text_element, Component, Element, ElementType, Event, EventHandler,
    PropValue, Props, RenderFnPtr,
};
pub use fiber::{EffectTag, Fiber, FiberArena, FiberId};
pub use hooks::{Hook, HookScope, RenderSignal, SetState, Update};
pub use host::{Host, HostError, HostNodeKind, HostOp, MemoryHost, NodeId};
pub use platform::{Clock, Deadline, IdleScheduler, ManualScheduler, StepDeadline, Unbounded};
pub use reconcile::reconcile_children;
pub use work_loop::{TickStatus, WorkLoop};
