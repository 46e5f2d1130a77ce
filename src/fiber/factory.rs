//! Node factory
//!
//! Turns element descriptors into fibers. The kind of the new fiber is
//! derived from the element type; structural markers (fragment, mode,
//! profiler, suspense) always get a wrapper fiber of their own so the
//! children keep a stable position for later diffing.

use std::sync::Arc;

use tracing::debug;

use super::arena::FiberArena;
use super::element::{Element, ElementType, ExoticKind, Marker, Portal};
use super::expiration::ExpirationTime;
use super::id::FiberId;
use super::node::StateNode;
use super::tag::{FiberTag, ModeFlags};
use crate::error::{ReconcileError, ReconcileResult};
use crate::host::HostNodeId;
use crate::util::diagnostic::{DiagnosticCode, Diagnostics};
use crate::value::Value;

/// Kind a resolved lazy component settles into.
pub fn resolve_lazy_component_tag(component: &ElementType) -> FiberTag {
    match component {
        ElementType::Component(c) if c.is_class => FiberTag::ClassComponent,
        ElementType::Component(_) => FiberTag::FunctionComponent,
        ElementType::Exotic(e) => match e.kind {
            Some(ExoticKind::ForwardRef) => FiberTag::ForwardRef,
            Some(ExoticKind::Memo) => FiberTag::MemoComponent,
            _ => FiberTag::IndeterminateComponent,
        },
        _ => FiberTag::IndeterminateComponent,
    }
}

/// Whether a memo wrapper around `component` can use the simple path:
/// a plain function without default props.
pub fn is_simple_function_component(component: &ElementType) -> bool {
    matches!(component, ElementType::Component(c) if !c.is_class && !c.has_default_props)
}

impl FiberArena {
    /// Create a fiber for `element_type`, resolving its kind.
    ///
    /// Fails with [`ReconcileError::InvalidElementType`] for values that are
    /// neither components, host tags, markers nor tagged objects.
    #[allow(clippy::too_many_arguments)]
    pub fn create_fiber_from_type_and_props(
        &mut self,
        element_type: &ElementType,
        key: Option<Arc<str>>,
        pending_props: Value,
        owner: Option<&str>,
        mode: ModeFlags,
        expiration_time: ExpirationTime,
        diagnostics: &mut Diagnostics,
    ) -> ReconcileResult<FiberId> {
        let mut mode = mode;
        let mut resolved_type = Some(element_type.clone());

        let tag = match element_type {
            ElementType::Component(c) if c.is_class => FiberTag::ClassComponent,
            ElementType::Component(_) => FiberTag::IndeterminateComponent,
            ElementType::Host(_) => FiberTag::HostComponent,
            ElementType::Marker(Marker::Fragment) => {
                validate_fragment_props(&pending_props, diagnostics);
                let children = pending_props.get("children").cloned().unwrap_or(Value::Null);
                return Ok(self.create_fiber_from_fragment(children, mode, expiration_time, key));
            }
            ElementType::Marker(Marker::ConcurrentMode) => {
                mode |= ModeFlags::CONCURRENT | ModeFlags::STRICT;
                FiberTag::Mode
            }
            ElementType::Marker(Marker::StrictMode) => {
                mode |= ModeFlags::STRICT;
                FiberTag::Mode
            }
            ElementType::Marker(Marker::Profiler) => {
                return Ok(self.create_fiber_from_profiler(
                    pending_props,
                    mode,
                    expiration_time,
                    key,
                    diagnostics,
                ));
            }
            ElementType::Marker(Marker::Suspense) => FiberTag::SuspenseComponent,
            ElementType::Exotic(exotic) => match exotic.kind {
                Some(ExoticKind::Provider) => FiberTag::ContextProvider,
                Some(ExoticKind::Context) => FiberTag::ContextConsumer,
                Some(ExoticKind::ForwardRef) => FiberTag::ForwardRef,
                Some(ExoticKind::Memo) => FiberTag::MemoComponent,
                Some(ExoticKind::Lazy) => {
                    resolved_type = None;
                    FiberTag::LazyComponent
                }
                None => {
                    return Err(ReconcileError::invalid_element_type(
                        element_type.describe(),
                        owner,
                    ))
                }
            },
            ElementType::Other(_) => {
                return Err(ReconcileError::invalid_element_type(
                    element_type.describe(),
                    owner,
                ))
            }
        };

        let id = self.create_fiber(tag, pending_props, key, mode);
        let fiber = self.get_mut(id)?;
        fiber.element_type = Some(element_type.clone());
        fiber.resolved_type = resolved_type;
        fiber.expiration_time = expiration_time;
        Ok(id)
    }

    /// Create a fiber for an element descriptor.
    pub fn create_fiber_from_element(
        &mut self,
        element: &Element,
        mode: ModeFlags,
        expiration_time: ExpirationTime,
        diagnostics: &mut Diagnostics,
    ) -> ReconcileResult<FiberId> {
        self.create_fiber_from_type_and_props(
            &element.element_type,
            element.key.clone(),
            element.props.clone(),
            element.owner.as_deref(),
            mode,
            expiration_time,
            diagnostics,
        )
    }

    /// Create a fragment wrapper whose pending props are the children.
    pub fn create_fiber_from_fragment(
        &mut self,
        children: Value,
        mode: ModeFlags,
        expiration_time: ExpirationTime,
        key: Option<Arc<str>>,
    ) -> FiberId {
        let id = self.create_fiber(FiberTag::Fragment, children, key, mode);
        self.set_creation_fields(id, ElementType::Marker(Marker::Fragment), expiration_time);
        id
    }

    fn create_fiber_from_profiler(
        &mut self,
        pending_props: Value,
        mode: ModeFlags,
        expiration_time: ExpirationTime,
        key: Option<Arc<str>>,
        diagnostics: &mut Diagnostics,
    ) -> FiberId {
        let has_id = pending_props.get("id").is_some_and(|v| v.as_str().is_some());
        let has_on_render = pending_props.get("onRender").is_some_and(Value::is_function);
        if !has_id || !has_on_render {
            diagnostics.warn(
                DiagnosticCode::InvalidProfilerProps,
                "Profiler",
                "Profiler must specify an \"id\" string and \"onRender\" function as props",
            );
        }

        let id = self.create_fiber(FiberTag::Profiler, pending_props, key, mode | ModeFlags::PROFILE);
        self.set_creation_fields(id, ElementType::Marker(Marker::Profiler), expiration_time);
        id
    }

    /// Create a host text fiber.
    pub fn create_fiber_from_text(
        &mut self,
        content: &str,
        mode: ModeFlags,
        expiration_time: ExpirationTime,
    ) -> FiberId {
        let id = self.create_fiber(FiberTag::HostText, Value::from(content), None, mode);
        if let Ok(fiber) = self.get_mut(id) {
            fiber.expiration_time = expiration_time;
        }
        id
    }

    /// Create a portal fiber rendering its children into another container.
    pub fn create_fiber_from_portal(
        &mut self,
        portal: &Portal,
        mode: ModeFlags,
        expiration_time: ExpirationTime,
    ) -> FiberId {
        let children = match &portal.children {
            Value::Null => Value::List(Vec::new()),
            other => other.clone(),
        };
        let id = self.create_fiber(FiberTag::HostPortal, children, portal.key.clone(), mode);
        if let Ok(fiber) = self.get_mut(id) {
            fiber.expiration_time = expiration_time;
            fiber.state_node = Some(StateNode::Portal(portal.container));
        }
        id
    }

    /// Create the root fiber of a host container.
    pub fn create_host_root_fiber(
        &mut self,
        container: HostNodeId,
        concurrent: bool,
        profile: bool,
    ) -> FiberId {
        let mut mode = ModeFlags::NO_CONTEXT;
        if concurrent {
            mode |= ModeFlags::CONCURRENT | ModeFlags::STRICT;
        }
        if profile {
            mode |= ModeFlags::PROFILE;
        }
        let id = self.create_fiber(FiberTag::HostRoot, Value::Null, None, mode);
        if let Ok(fiber) = self.get_mut(id) {
            fiber.state_node = Some(StateNode::Root(container));
        }
        id
    }

    /// Settle a lazy fiber once its component has loaded.
    pub fn resolve_lazy(
        &mut self,
        fiber: FiberId,
        component: ElementType,
    ) -> ReconcileResult<FiberTag> {
        let node = self.get(fiber)?;
        if node.tag != FiberTag::LazyComponent {
            return Err(ReconcileError::InvalidTagResolution {
                fiber,
                tag: resolve_lazy_component_tag(&component),
            });
        }
        let tag = resolve_lazy_component_tag(&component);
        let alternate = node.alternate.filter(|alt| self.contains(*alt));
        if let Some(alt) = alternate {
            let alt = self.get_mut(alt)?;
            alt.tag = tag;
            alt.resolved_type = Some(component.clone());
        }
        let node = self.get_mut(fiber)?;
        node.tag = tag;
        node.resolved_type = Some(component);
        debug!(fiber = %fiber, ?tag, "resolved lazy component");
        Ok(tag)
    }

    fn set_creation_fields(
        &mut self,
        id: FiberId,
        element_type: ElementType,
        expiration_time: ExpirationTime,
    ) {
        if let Ok(fiber) = self.get_mut(id) {
            fiber.resolved_type = Some(element_type.clone());
            fiber.element_type = Some(element_type);
            fiber.expiration_time = expiration_time;
        }
    }
}

fn validate_fragment_props(
    props: &Value,
    diagnostics: &mut Diagnostics,
) {
    let Some(fields) = props.as_map() else {
        return;
    };
    for name in fields.keys() {
        if name.as_ref() != "children" && name.as_ref() != "key" {
            diagnostics.warn(
                DiagnosticCode::InvalidFragmentProp,
                name.to_string(),
                format!(
                    "Invalid prop `{}` supplied to a fragment. Fragments can only have `key` and `children` props.",
                    name
                ),
            );
        }
    }
}
