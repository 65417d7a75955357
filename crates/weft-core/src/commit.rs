//! Commit phase: applies the effect tags of a finished pass to the host.
//!
//! Runs to completion without yielding. Deletions go first so that no removed
//! node is still attached when new nodes are appended.

use crate::element::{event_name, is_event_key, is_property_key, Props};
use crate::fiber::{EffectTag, FiberArena, FiberId};
use crate::host::{Host, HostError, NodeId};

/// Counts of effect tags consumed by one commit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub placements: usize,
    pub updates: usize,
    pub deletions: usize,
}

impl CommitSummary {
    /// Whether the commit placed or removed anything.
    pub fn is_structural(&self) -> bool {
        self.placements > 0 || self.deletions > 0
    }
}

pub fn commit_root<H: Host + ?Sized>(
    host: &mut H,
    fibers: &mut FiberArena,
    wip_root: FiberId,
    deletions: &[FiberId],
) -> Result<CommitSummary, HostError> {
    let mut summary = CommitSummary::default();

    for &deleted in deletions {
        let parent_dom = fibers
            .nearest_host_parent(deleted)
            .ok_or(HostError::Detached)?;
        commit_deletion(host, fibers, deleted, parent_dom)?;
        fibers[deleted].effect_tag = EffectTag::None;
        summary.deletions += 1;
    }

    let mut next = fibers[wip_root].child;
    while let Some(id) = next {
        commit_work(host, fibers, id, &mut summary)?;
        next = fibers.next_in_preorder(id, wip_root);
    }

    Ok(summary)
}

fn commit_work<H: Host + ?Sized>(
    host: &mut H,
    fibers: &mut FiberArena,
    id: FiberId,
    summary: &mut CommitSummary,
) -> Result<(), HostError> {
    let fiber = &fibers[id];
    match (fiber.effect_tag, fiber.dom) {
        (EffectTag::Placement, Some(dom)) => {
            let parent_dom = fibers.nearest_host_parent(id).ok_or(HostError::Detached)?;
            host.append_child(parent_dom, dom)?;
            summary.placements += 1;
        }
        (EffectTag::Update, Some(dom)) => {
            if let Some(alternate) = fiber.alternate {
                update_host_properties(host, dom, &fibers[alternate].props, &fiber.props)?;
            }
            summary.updates += 1;
        }
        (EffectTag::Placement, None) => summary.placements += 1,
        (EffectTag::Update, None) => summary.updates += 1,
        (EffectTag::Deletion, _) | (EffectTag::None, _) => {}
    }

    for hook in &fiber.hooks {
        hook.commit();
    }
    fibers[id].effect_tag = EffectTag::None;
    Ok(())
}

/// Detaches the host nodes of `id` from `parent_dom`. A fiber without a host
/// node of its own hands the removal down to its children.
fn commit_deletion<H: Host + ?Sized>(
    host: &mut H,
    fibers: &FiberArena,
    id: FiberId,
    parent_dom: NodeId,
) -> Result<(), HostError> {
    if let Some(dom) = fibers[id].dom {
        return host.remove_child(parent_dom, dom);
    }
    for child in fibers.children(id) {
        commit_deletion(host, fibers, child, parent_dom)?;
    }
    Ok(())
}

/// Applies the difference between `prev` and `next` to a host node.
///
/// Listeners that vanished or changed are removed before new or changed ones
/// are added, so a node never carries both the old and the new handler.
/// Removed plain properties are cleared; new or changed ones are assigned.
pub fn update_host_properties<H: Host + ?Sized>(
    host: &mut H,
    node: NodeId,
    prev: &Props,
    next: &Props,
) -> Result<(), HostError> {
    for (key, value) in prev.iter().filter(|(key, _)| is_event_key(key)) {
        if next.get(key) == Some(value) {
            continue;
        }
        if let Some(handler) = value.as_handler() {
            host.remove_event_listener(node, &event_name(key), handler)?;
        }
    }

    for (key, value) in next.iter().filter(|(key, _)| is_event_key(key)) {
        if prev.get(key) == Some(value) {
            continue;
        }
        match value.as_handler() {
            Some(handler) => host.add_event_listener(node, &event_name(key), handler)?,
            None => log::warn!("prop {key} looks like an event but holds {value:?}"),
        }
    }

    for (key, _) in prev.iter().filter(|(key, _)| is_property_key(key)) {
        if !next.contains_key(key) {
            host.clear_property(node, key)?;
        }
    }

    for (key, value) in next.iter().filter(|(key, _)| is_property_key(key)) {
        if prev.get(key) != Some(value) {
            host.set_property(node, key, value)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/commit_tests.rs"]
mod tests;
