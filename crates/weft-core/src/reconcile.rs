//! Positional child diff.
//!
//! Matching is by sibling index and element type only. There are no keys: an
//! element that moves to another index is a deletion at the old index plus a
//! placement at the new one.

use crate::element::Element;
use crate::fiber::{EffectTag, Fiber, FiberArena, FiberId};

/// Rebuilds the child chain of `wip` from `elements`, diffing against the
/// children of its alternate.
///
/// Old fibers without a same-type replacement are tagged [`EffectTag::Deletion`]
/// and appended to `deletions`. Runs in O(max(old, new)).
pub fn reconcile_children(
    fibers: &mut FiberArena,
    wip: FiberId,
    elements: &[Element],
    deletions: &mut Vec<FiberId>,
) {
    let mut old_fiber = fibers[wip].alternate.and_then(|alternate| fibers[alternate].child);
    let mut previous: Option<FiberId> = None;
    let mut index = 0;
    fibers[wip].child = None;

    while index < elements.len() || old_fiber.is_some() {
        let element = elements.get(index);

        let same_type = match (old_fiber, element) {
            (Some(old), Some(element)) => fibers[old].ty.as_ref() == Some(element.ty()),
            _ => false,
        };

        let new_fiber = match (old_fiber, element) {
            (Some(old), Some(element)) if same_type => {
                let dom = fibers[old].dom;
                Some(fibers.insert(Fiber::update(
                    element.ty().clone(),
                    element.props().clone(),
                    dom,
                    wip,
                    old,
                )))
            }
            (_, Some(element)) => Some(fibers.insert(Fiber::placement(
                element.ty().clone(),
                element.props().clone(),
                wip,
            ))),
            (_, None) => None,
        };

        if let Some(old) = old_fiber {
            if !same_type {
                fibers[old].effect_tag = EffectTag::Deletion;
                deletions.push(old);
            }
            old_fiber = fibers[old].sibling;
        }

        if let Some(new_fiber) = new_fiber {
            match previous {
                None => fibers[wip].child = Some(new_fiber),
                Some(previous) => fibers[previous].sibling = Some(new_fiber),
            }
            previous = Some(new_fiber);
        }

        index += 1;
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
