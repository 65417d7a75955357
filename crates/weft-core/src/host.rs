//! Host display tree abstraction.
//!
//! The reconciler never touches a concrete display API. It drives a [`Host`],
//! which owns the real nodes and hands out [`NodeId`] handles. [`MemoryHost`]
//! is a complete in-memory host that also records every mutation it receives.

use std::fmt;
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::element::{Event, EventHandler, PropValue, NODE_VALUE_KEY};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    Missing { id: NodeId },
    NotAChild { parent: NodeId, child: NodeId },
    NotAContainer { id: NodeId },
    /// A fiber that needed a host parent had no ancestor owning a host node.
    Detached,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Missing { id } => write!(f, "host node {id} missing"),
            HostError::NotAChild { parent, child } => {
                write!(f, "host node {child} is not a child of {parent}")
            }
            HostError::NotAContainer { id } => {
                write!(f, "host node {id} cannot hold children")
            }
            HostError::Detached => write!(f, "fiber has no ancestor owning a host node"),
        }
    }
}

impl std::error::Error for HostError {}

/// Mutation interface of the host display tree.
pub trait Host {
    fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError>;
    fn create_text_node(&mut self) -> Result<NodeId, HostError>;
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;
    fn set_property(&mut self, node: NodeId, key: &str, value: &PropValue)
        -> Result<(), HostError>;
    fn clear_property(&mut self, node: NodeId, key: &str) -> Result<(), HostError>;
    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;
    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;
}

/// One mutation received by a [`MemoryHost`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    CreateNode { id: NodeId, tag: Rc<str> },
    CreateTextNode { id: NodeId },
    AppendChild { parent: NodeId, child: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
    SetProperty { node: NodeId, key: String, value: PropValue },
    ClearProperty { node: NodeId, key: String },
    AddEventListener { node: NodeId, event: String },
    RemoveEventListener { node: NodeId, event: String },
}

impl HostOp {
    /// Whether this op changes the host tree after nodes exist (anything but creation).
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            HostOp::CreateNode { .. } | HostOp::CreateTextNode { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNodeKind {
    Element(Rc<str>),
    Text,
}

pub struct HostNode {
    kind: HostNodeKind,
    properties: HashMap<String, PropValue>,
    listeners: Vec<(String, EventHandler)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl HostNode {
    fn new(kind: HostNodeKind) -> Self {
        Self {
            kind,
            properties: HashMap::default(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn kind(&self) -> &HostNodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn property(&self, key: &str) -> Option<&PropValue> {
        self.properties.get(key)
    }
}

#[derive(Default)]
pub struct MemoryHost {
    nodes: Vec<Option<HostNode>>,
    ops: Vec<HostOp>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element node to render into. Not recorded as an op.
    pub fn create_container(&mut self) -> NodeId {
        self.insert(HostNode::new(HostNodeKind::Element(Rc::from("root"))))
    }

    pub fn node(&self, id: NodeId) -> Result<&HostNode, HostError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(HostError::Missing { id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut HostNode, HostError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(HostError::Missing { id })
    }

    fn insert(&mut self, node: HostNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(node));
        id
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], HostError> {
        Ok(self.node(id)?.children())
    }

    pub fn property(&self, id: NodeId, key: &str) -> Option<&PropValue> {
        self.node(id).ok()?.property(key)
    }

    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.node(id)
            .map(|node| node.listeners.iter().filter(|(name, _)| name == event).count())
            .unwrap_or(0)
    }

    /// Invokes every listener registered on `id` for `event`. Returns how many ran.
    pub fn dispatch_event(&self, id: NodeId, event: &str) -> Result<usize, HostError> {
        let handlers: Vec<EventHandler> = self
            .node(id)?
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect();
        let payload = Event::new(event, id);
        for handler in &handlers {
            handler.call(&payload);
        }
        Ok(handlers.len())
    }

    /// Concatenated text of every text node under `id`, in tree order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.collect_text(id, &mut output);
        output
    }

    fn collect_text(&self, id: NodeId, output: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        if node.kind == HostNodeKind::Text {
            if let Some(value) = node.property(NODE_VALUE_KEY) {
                output.push_str(&value.to_string());
            }
        }
        for &child in &node.children {
            self.collect_text(child, output);
        }
    }

    /// Recorded mutations since the last [`MemoryHost::take_ops`].
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dump_tree(&self, root: NodeId) -> String {
        let mut output = String::new();
        self.dump_node(&mut output, root, 0);
        output
    }

    fn dump_node(&self, output: &mut String, id: NodeId, depth: usize) {
        let indent = "  ".repeat(depth);
        let Ok(node) = self.node(id) else {
            output.push_str(&format!("{indent}[{id}] (missing)\n"));
            return;
        };
        match &node.kind {
            HostNodeKind::Text => {
                let text = node
                    .property(NODE_VALUE_KEY)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                output.push_str(&format!("{indent}[{id}] {text:?}\n"));
            }
            HostNodeKind::Element(tag) => {
                let mut props: Vec<String> = node
                    .properties
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect();
                props.sort();
                if props.is_empty() {
                    output.push_str(&format!("{indent}[{id}] <{tag}>\n"));
                } else {
                    output.push_str(&format!("{indent}[{id}] <{tag} {}>\n", props.join(" ")));
                }
                for &child in &node.children {
                    self.dump_node(output, child, depth + 1);
                }
            }
        }
    }
}

impl Host for MemoryHost {
    fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError> {
        let tag: Rc<str> = Rc::from(tag);
        let id = self.insert(HostNode::new(HostNodeKind::Element(tag.clone())));
        self.ops.push(HostOp::CreateNode { id, tag });
        Ok(id)
    }

    fn create_text_node(&mut self) -> Result<NodeId, HostError> {
        let id = self.insert(HostNode::new(HostNodeKind::Text));
        self.ops.push(HostOp::CreateTextNode { id });
        Ok(id)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.node(child)?;
        let parent_node = self.node_mut(parent)?;
        if parent_node.kind == HostNodeKind::Text {
            return Err(HostError::NotAContainer { id: parent });
        }
        parent_node.children.retain(|&existing| existing != child);
        parent_node.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.ops.push(HostOp::AppendChild { parent, child });
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let parent_node = self.node_mut(parent)?;
        let position = parent_node
            .children
            .iter()
            .position(|&existing| existing == child)
            .ok_or(HostError::NotAChild { parent, child })?;
        parent_node.children.remove(position);
        self.node_mut(child)?.parent = None;
        self.ops.push(HostOp::RemoveChild { parent, child });
        Ok(())
    }

    fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        self.node_mut(node)?
            .properties
            .insert(key.to_owned(), value.clone());
        self.ops.push(HostOp::SetProperty {
            node,
            key: key.to_owned(),
            value: value.clone(),
        });
        Ok(())
    }

    fn clear_property(&mut self, node: NodeId, key: &str) -> Result<(), HostError> {
        self.node_mut(node)?
            .properties
            .insert(key.to_owned(), PropValue::empty());
        self.ops.push(HostOp::ClearProperty {
            node,
            key: key.to_owned(),
        });
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.node_mut(node)?
            .listeners
            .push((event.to_owned(), handler.clone()));
        self.ops.push(HostOp::AddEventListener {
            node,
            event: event.to_owned(),
        });
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let listeners = &mut self.node_mut(node)?.listeners;
        if let Some(position) = listeners
            .iter()
            .position(|(name, existing)| name == event && existing == handler)
        {
            listeners.remove(position);
        }
        self.ops.push(HostOp::RemoveEventListener {
            node,
            event: event.to_owned(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
