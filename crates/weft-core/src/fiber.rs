//! Fiber arena: the mutable work representation mirroring the element tree.
//!
//! Fibers use the first-child/next-sibling encoding. The committed tree and the
//! work-in-progress tree are disjoint sets of entries in one arena; `alternate`
//! links cross between them and are resolved by lookup.

use std::ops::{Index, IndexMut};
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::element::{ElementType, Props};
use crate::hooks::Hook;
use crate::host::NodeId;

new_key_type! {
    /// Generational handle to a fiber in a [`FiberArena`].
    pub struct FiberId;
}

/// Pending host mutation decided at reconciliation time and consumed at commit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum EffectTag {
    Placement,
    Update,
    Deletion,
    #[default]
    None,
}

pub struct Fiber {
    /// Element type; `None` only for the container root.
    pub ty: Option<ElementType>,
    pub props: Rc<Props>,
    pub dom: Option<NodeId>,
    pub parent: Option<FiberId>,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    pub alternate: Option<FiberId>,
    pub effect_tag: EffectTag,
    pub hooks: Vec<Hook>,
}

impl Fiber {
    pub(crate) fn root(container: NodeId, props: Rc<Props>, alternate: Option<FiberId>) -> Self {
        Self {
            ty: None,
            props,
            dom: Some(container),
            parent: None,
            child: None,
            sibling: None,
            alternate,
            effect_tag: EffectTag::None,
            hooks: Vec::new(),
        }
    }

    pub(crate) fn placement(ty: ElementType, props: Rc<Props>, parent: FiberId) -> Self {
        Self {
            ty: Some(ty),
            props,
            dom: None,
            parent: Some(parent),
            child: None,
            sibling: None,
            alternate: None,
            effect_tag: EffectTag::Placement,
            hooks: Vec::new(),
        }
    }

    pub(crate) fn update(
        ty: ElementType,
        props: Rc<Props>,
        dom: Option<NodeId>,
        parent: FiberId,
        alternate: FiberId,
    ) -> Self {
        Self {
            ty: Some(ty),
            props,
            dom,
            parent: Some(parent),
            child: None,
            sibling: None,
            alternate: Some(alternate),
            effect_tag: EffectTag::Update,
            hooks: Vec::new(),
        }
    }

    pub fn is_component(&self) -> bool {
        self.ty.as_ref().is_some_and(ElementType::is_component)
    }
}

#[derive(Default)]
pub struct FiberArena {
    fibers: SlotMap<FiberId, Fiber>,
}

impl FiberArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fiber: Fiber) -> FiberId {
        self.fibers.insert(fiber)
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber> {
        self.fibers.get(id)
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.fibers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Direct children of `id`, following the sibling chain.
    pub fn children(&self, id: FiberId) -> Children<'_> {
        Children {
            arena: self,
            next: self.fibers.get(id).and_then(|fiber| fiber.child),
        }
    }

    /// Next fiber in depth-first pre-order, never leaving the subtree of `root`.
    ///
    /// Prefers the child, then the sibling, then the first ancestor sibling.
    pub fn next_in_preorder(&self, id: FiberId, root: FiberId) -> Option<FiberId> {
        let fiber = &self.fibers[id];
        if let Some(child) = fiber.child {
            return Some(child);
        }
        let mut current = id;
        while current != root {
            let fiber = &self.fibers[current];
            if let Some(sibling) = fiber.sibling {
                return Some(sibling);
            }
            current = fiber.parent?;
        }
        None
    }

    /// Host node of the closest ancestor of `id` that owns one.
    pub fn nearest_host_parent(&self, id: FiberId) -> Option<NodeId> {
        let mut current = self.fibers.get(id)?.parent;
        while let Some(parent) = current {
            let fiber = self.fibers.get(parent)?;
            if let Some(dom) = fiber.dom {
                return Some(dom);
            }
            current = fiber.parent;
        }
        None
    }

    /// Every fiber reachable from `root` through child/sibling links, root first.
    pub fn subtree(&self, root: FiberId) -> Vec<FiberId> {
        let mut collected = Vec::new();
        let mut stack: SmallVec<[FiberId; 16]> = SmallVec::new();
        if self.fibers.contains_key(root) {
            stack.push(root);
        }
        while let Some(id) = stack.pop() {
            let Some(fiber) = self.fibers.get(id) else {
                continue;
            };
            collected.push(id);
            let mut child = fiber.child;
            while let Some(next) = child {
                stack.push(next);
                child = self.fibers.get(next).and_then(|fiber| fiber.sibling);
            }
        }
        collected
    }

    /// Removes `root` and everything below it from the arena.
    pub fn release_subtree(&mut self, root: FiberId) -> usize {
        let ids = self.subtree(root);
        for &id in &ids {
            self.fibers.remove(id);
        }
        ids.len()
    }
}

impl Index<FiberId> for FiberArena {
    type Output = Fiber;

    fn index(&self, id: FiberId) -> &Fiber {
        &self.fibers[id]
    }
}

impl IndexMut<FiberId> for FiberArena {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber {
        &mut self.fibers[id]
    }
}

pub struct Children<'a> {
    arena: &'a FiberArena,
    next: Option<FiberId>,
}

impl Iterator for Children<'_> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        self.next = self.arena.get(id).and_then(|fiber| fiber.sibling);
        Some(id)
    }
}

#[cfg(test)]
#[path = "tests/fiber_tests.rs"]
mod tests;
