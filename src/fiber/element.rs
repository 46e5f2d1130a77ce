//! Element descriptors
//!
//! An [`Element`] is the application's description of one node: a type,
//! an optional key and its props. The factory turns elements into fibers.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::host::HostNodeId;
use crate::value::{Function, Value};

/// Identity of a context object shared by its provider and consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u32);

/// An application component (function or class).
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentType {
    /// Display name
    pub name: Arc<str>,
    /// Constructor marker: the component is a class
    pub is_class: bool,
    /// Render / constructor function, when the caller has one
    pub render: Option<Function>,
    /// Whether the component declares default props
    pub has_default_props: bool,
}

impl ComponentType {
    /// A plain function component.
    pub fn function(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            is_class: false,
            render: None,
            has_default_props: false,
        }
    }

    /// A class component.
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self {
            is_class: true,
            ..Self::function(name)
        }
    }

    /// Attach the render function.
    pub fn with_render(
        mut self,
        render: Function,
    ) -> Self {
        self.render = Some(render);
        self
    }
}

/// Well-known structural markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Fragment,
    StrictMode,
    ConcurrentMode,
    Profiler,
    Suspense,
}

/// Tag of an exotic type object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExoticKind {
    ForwardRef,
    Memo,
    Lazy,
    Provider,
    Context,
}

/// A tagged type object (forward-ref, memo, lazy, provider, context).
#[derive(Debug, Clone, PartialEq)]
pub struct ExoticType {
    /// Tag; an untagged object is not a valid element type
    pub kind: Option<ExoticKind>,
    /// Wrapped type (memo, forward-ref render, resolved lazy)
    pub inner: Option<ElementType>,
    /// Context identity for providers and consumers
    pub context: Option<ContextId>,
}

impl ExoticType {
    /// Build a tagged object wrapping `inner`.
    pub fn new(
        kind: ExoticKind,
        inner: Option<ElementType>,
    ) -> Self {
        Self {
            kind: Some(kind),
            inner,
            context: None,
        }
    }

    /// Provider for `context`.
    pub fn provider(context: ContextId) -> Self {
        Self {
            kind: Some(ExoticKind::Provider),
            inner: None,
            context: Some(context),
        }
    }

    /// Consumer of `context`.
    pub fn consumer(context: ContextId) -> Self {
        Self {
            kind: Some(ExoticKind::Context),
            inner: None,
            context: Some(context),
        }
    }
}

/// Application-level type of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// Function or class component
    Component(Rc<ComponentType>),
    /// Host element tag name
    Host(Arc<str>),
    /// Structural marker
    Marker(Marker),
    /// Tagged type object
    Exotic(Rc<ExoticType>),
    /// Any other value; rejected by the factory
    Other(Value),
}

impl ElementType {
    /// Host tag shorthand.
    pub fn host(tag: impl Into<Arc<str>>) -> Self {
        ElementType::Host(tag.into())
    }

    /// Component shorthand.
    pub fn component(component: ComponentType) -> Self {
        ElementType::Component(Rc::new(component))
    }

    /// Exotic shorthand.
    pub fn exotic(exotic: ExoticType) -> Self {
        ElementType::Exotic(Rc::new(exotic))
    }

    /// Host tag name, for host elements.
    pub fn host_tag(&self) -> Option<&str> {
        match self {
            ElementType::Host(tag) => Some(tag),
            _ => None,
        }
    }

    /// Human-readable description used in diagnostics and errors.
    pub fn describe(&self) -> String {
        match self {
            ElementType::Component(c) => c.name.to_string(),
            ElementType::Host(tag) => tag.to_string(),
            ElementType::Marker(m) => format!("{:?}", m),
            ElementType::Exotic(e) => match e.kind {
                Some(kind) => format!("{:?}", kind),
                None => "object".to_string(),
            },
            ElementType::Other(value) => match value {
                Value::Null => "null".to_string(),
                Value::Map(m) if m.is_empty() => {
                    "object. You likely forgot to export your component from the file \
                     it's defined in, or you might have mixed up default and named imports"
                        .to_string()
                }
                other => other.type_name().to_string(),
            },
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Element descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Type of the element
    pub element_type: ElementType,
    /// Sibling-unique key
    pub key: Option<Arc<str>>,
    /// Props (a map value, or `Null`)
    pub props: Value,
    /// Name of the component that rendered this element, for diagnostics
    pub owner: Option<Arc<str>>,
}

impl Element {
    /// Create an element without key or owner.
    pub fn new(
        element_type: ElementType,
        props: Value,
    ) -> Self {
        Self {
            element_type,
            key: None,
            props,
            owner: None,
        }
    }

    /// Set the key.
    pub fn with_key(
        mut self,
        key: impl Into<Arc<str>>,
    ) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the owner name.
    pub fn with_owner(
        mut self,
        owner: impl Into<Arc<str>>,
    ) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// Portal descriptor: children rendered into another host container.
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    /// Target container
    pub container: HostNodeId,
    /// Children value (`Null` means none)
    pub children: Value,
    /// Sibling-unique key
    pub key: Option<Arc<str>>,
}
