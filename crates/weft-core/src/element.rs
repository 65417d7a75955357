//! Immutable element descriptions.
//!
//! An [`Element`] describes one node of the desired UI: its type, its
//! properties, and an ordered list of child descriptions. Elements are built
//! fresh for every render and never mutated afterwards; the reconciler copies
//! what it needs into fibers.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::collections::OrderedMap;
use crate::hooks::HookScope;
use crate::host::NodeId;

/// Property key that names an element's children. Never stored as a plain value.
pub const CHILDREN_KEY: &str = "children";

/// Property key holding the text of a text element.
pub const NODE_VALUE_KEY: &str = "nodeValue";

/// Prefix that marks a property as an event listener (`onClick`, `onInput`, ...).
pub const EVENT_PREFIX: &str = "on";

/// Event delivered to listeners by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: Rc<str>,
    pub target: NodeId,
}

impl Event {
    pub fn new(name: impl Into<Rc<str>>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

/// Shared event callback. Two handlers are equal only if they share the same callable.
#[derive(Clone)]
pub struct EventHandler {
    callback: Rc<dyn Fn(&Event)>,
}

impl EventHandler {
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub fn call(&self, event: &Event) {
        (self.callback)(event);
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.callback))
    }
}

/// Value stored under a property key.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Text(Rc<str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    pub fn empty() -> Self {
        PropValue::Text(Rc::from(""))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(text) => f.write_str(text),
            PropValue::Int(value) => write!(f, "{value}"),
            PropValue::Float(value) => write!(f, "{value}"),
            PropValue::Bool(value) => write!(f, "{value}"),
            PropValue::Handler(handler) => write!(f, "{handler:?}"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(Rc::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(Rc::from(value))
    }
}

impl From<Rc<str>> for PropValue {
    fn from(value: Rc<str>) -> Self {
        PropValue::Text(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

/// Returns whether `key` names an event listener.
pub fn is_event_key(key: &str) -> bool {
    key.starts_with(EVENT_PREFIX)
}

/// Returns whether `key` names a plain host property.
pub fn is_property_key(key: &str) -> bool {
    key != CHILDREN_KEY && !is_event_key(key)
}

/// Maps an event prop key to the host event name: `onClick` becomes `click`.
pub fn event_name(key: &str) -> String {
    key.strip_prefix(EVENT_PREFIX)
        .unwrap_or(key)
        .to_ascii_lowercase()
}

/// Property bag of an element: ordered plain/event values plus children.
#[derive(Clone, Default)]
pub struct Props {
    values: OrderedMap<Rc<str>, PropValue>,
    children: Vec<Element>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. The reserved children key is ignored.
    pub fn with(mut self, key: impl Into<Rc<str>>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Shorthand for attaching an event listener prop.
    pub fn on(self, key: impl Into<Rc<str>>, handler: impl Fn(&Event) + 'static) -> Self {
        self.with(key, EventHandler::new(handler))
    }

    pub fn insert(&mut self, key: impl Into<Rc<str>>, value: impl Into<PropValue>) {
        let key = key.into();
        if &*key == CHILDREN_KEY {
            return;
        }
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(key, value)| (&**key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub(crate) fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("values", &self.values)
            .field("children", &self.children.len())
            .finish()
    }
}

type RenderFn = dyn Fn(&Props, &mut HookScope) -> Element;

/// Plain function pointer accepted as a component.
pub type RenderFnPtr = fn(&Props, &mut HookScope) -> Element;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ComponentIdentity {
    /// Zero-sized callable: fn items and non-capturing closures.
    Type(TypeId),
    /// Function pointer, keyed by address.
    Function(usize),
    /// Stateful callable, keyed by its shared allocation.
    Instance(usize),
}

/// Function component: a callable producing a single child element from props.
///
/// Components built from the same fn item or the same non-capturing closure
/// expression are the same component across renders. Function pointers are
/// the same component when they point at the same function. Capturing closures
/// are only equal to clones of the `Component` they were wrapped in. A fn item
/// and a pointer to the same function are different components, so pick one
/// form per call site.
#[derive(Clone)]
pub struct Component {
    identity: ComponentIdentity,
    name: &'static str,
    render: Rc<RenderFn>,
}

impl Component {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Props, &mut HookScope) -> Element + 'static,
    {
        if let Some(&function) = (&render as &dyn Any).downcast_ref::<RenderFnPtr>() {
            return Self::from_fn(function);
        }
        let name = std::any::type_name::<F>();
        let render: Rc<RenderFn> = Rc::new(render);
        let identity = if std::mem::size_of::<F>() == 0 {
            ComponentIdentity::Type(TypeId::of::<F>())
        } else {
            ComponentIdentity::Instance(Rc::as_ptr(&render) as *const () as usize)
        };
        Self {
            identity,
            name,
            render,
        }
    }

    pub fn from_fn(render: RenderFnPtr) -> Self {
        Self {
            identity: ComponentIdentity::Function(render as usize),
            name: std::any::type_name::<RenderFnPtr>(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call(&self, props: &Props, scope: &mut HookScope) -> Element {
        (self.render)(props, scope)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.name)
    }
}

/// What kind of node an element describes.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementType {
    /// Host node kind, e.g. `"div"`.
    Host(Rc<str>),
    /// Reserved text kind.
    Text,
    Component(Component),
}

impl ElementType {
    pub fn is_component(&self) -> bool {
        matches!(self, ElementType::Component(_))
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Host(Rc::from(tag))
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Host(Rc::from(tag))
    }
}

impl From<Component> for ElementType {
    fn from(component: Component) -> Self {
        ElementType::Component(component)
    }
}

/// Immutable description of one UI node and its children.
#[derive(Clone, Debug)]
pub struct Element {
    ty: ElementType,
    props: Rc<Props>,
}

impl Element {
    pub fn ty(&self) -> &ElementType {
        &self.ty
    }

    pub fn props(&self) -> &Rc<Props> {
        &self.props
    }

    pub fn children(&self) -> &[Element] {
        self.props.children()
    }
}

/// Builds an element. Children that are not elements are wrapped as text
/// elements through their `Into<Element>` conversion.
pub fn create_element<C>(
    ty: impl Into<ElementType>,
    props: Props,
    children: impl IntoIterator<Item = C>,
) -> Element
where
    C: Into<Element>,
{
    let children = children.into_iter().map(Into::into).collect();
    Element {
        ty: ty.into(),
        props: Rc::new(props.with_children(children)),
    }
}

/// Builds a text element holding `text` under the `nodeValue` prop.
pub fn create_text_element(text: impl Into<Rc<str>>) -> Element {
    Element {
        ty: ElementType::Text,
        props: Rc::new(Props::new().with(NODE_VALUE_KEY, PropValue::Text(text.into()))),
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        create_text_element(text)
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        create_text_element(text)
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        create_text_element(value.to_string())
    }
}

impl From<i32> for Element {
    fn from(value: i32) -> Self {
        create_text_element(value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod tests;
