//! Fiber record
//!
//! A fiber describes one position in the current tree or the
//! work-in-progress tree together with the work pending there.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::element::{ContextId, ElementType};
use super::expiration::ExpirationTime;
use super::id::FiberId;
use super::tag::{FiberTag, ModeFlags, SideEffectFlags};
use crate::host::HostNodeId;
use crate::update_queue::QueueRef;
use crate::value::Value;

/// Host-specific state attached to a fiber.
#[derive(Debug, Clone, PartialEq)]
pub enum StateNode {
    /// Host root: the container the tree renders into
    Root(HostNodeId),
    /// Portal: the container its children render into
    Portal(HostNodeId),
    /// Host element or text instance
    Host(HostNodeId),
    /// Class component instance
    Instance(Value),
}

/// One context read by a fiber during render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextDependency {
    /// Context that was read
    pub context: ContextId,
    /// Bits of the context value the reader cares about
    pub observed_bits: u32,
}

/// Ordered list of contexts a fiber read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextDependencies {
    /// Most urgent pending work among the read contexts
    pub expiration_time: ExpirationTime,
    /// Reads in the order they happened
    pub items: Vec<ContextDependency>,
}

/// A unit of work.
///
/// Links to other fibers are arena handles; none of them own their target.
#[derive(Clone)]
pub struct Fiber {
    // -- Identity --
    pub(crate) tag: FiberTag,
    pub(crate) key: Option<Arc<str>>,
    pub(crate) element_type: Option<ElementType>,
    pub(crate) resolved_type: Option<ElementType>,
    pub(crate) state_node: Option<StateNode>,
    pub(crate) ref_value: Option<Value>,

    // -- Topology --
    pub(crate) parent: Option<FiberId>,
    pub(crate) child: Option<FiberId>,
    pub(crate) sibling: Option<FiberId>,
    pub(crate) index: usize,

    // -- Work payload --
    pub(crate) pending_props: Value,
    pub(crate) memoized_props: Value,
    pub(crate) memoized_state: Value,
    pub(crate) update_queue: Option<QueueRef>,
    pub(crate) context_dependencies: Option<Rc<ContextDependencies>>,

    // -- Scheduling --
    pub(crate) mode: ModeFlags,
    pub(crate) effect_tag: SideEffectFlags,
    pub(crate) expiration_time: ExpirationTime,
    pub(crate) child_expiration_time: ExpirationTime,

    // -- Effect list --
    pub(crate) next_effect: Option<FiberId>,
    pub(crate) first_effect: Option<FiberId>,
    pub(crate) last_effect: Option<FiberId>,

    // -- Double buffer --
    pub(crate) alternate: Option<FiberId>,
}

impl Fiber {
    /// Fresh fiber; payload empty, flags cleared, nothing pending.
    pub(crate) fn new(
        tag: FiberTag,
        pending_props: Value,
        key: Option<Arc<str>>,
        mode: ModeFlags,
    ) -> Self {
        Self {
            tag,
            key,
            element_type: None,
            resolved_type: None,
            state_node: None,
            ref_value: None,
            parent: None,
            child: None,
            sibling: None,
            index: 0,
            pending_props,
            memoized_props: Value::Null,
            memoized_state: Value::Null,
            update_queue: None,
            context_dependencies: None,
            mode,
            effect_tag: SideEffectFlags::NO_EFFECT,
            expiration_time: ExpirationTime::NO_WORK,
            child_expiration_time: ExpirationTime::NO_WORK,
            next_effect: None,
            first_effect: None,
            last_effect: None,
            alternate: None,
        }
    }

    #[inline]
    pub fn tag(&self) -> FiberTag {
        self.tag
    }

    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[inline]
    pub fn element_type(&self) -> Option<&ElementType> {
        self.element_type.as_ref()
    }

    /// Type after lazy / default-props resolution; `None` while unresolved.
    #[inline]
    pub fn resolved_type(&self) -> Option<&ElementType> {
        self.resolved_type.as_ref()
    }

    #[inline]
    pub fn state_node(&self) -> Option<&StateNode> {
        self.state_node.as_ref()
    }

    #[inline]
    pub fn ref_value(&self) -> Option<&Value> {
        self.ref_value.as_ref()
    }

    #[inline]
    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    #[inline]
    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    #[inline]
    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn pending_props(&self) -> &Value {
        &self.pending_props
    }

    #[inline]
    pub fn memoized_props(&self) -> &Value {
        &self.memoized_props
    }

    #[inline]
    pub fn memoized_state(&self) -> &Value {
        &self.memoized_state
    }

    #[inline]
    pub fn update_queue(&self) -> Option<&QueueRef> {
        self.update_queue.as_ref()
    }

    #[inline]
    pub fn context_dependencies(&self) -> Option<&ContextDependencies> {
        self.context_dependencies.as_deref()
    }

    #[inline]
    pub fn mode(&self) -> ModeFlags {
        self.mode
    }

    #[inline]
    pub fn effect_tag(&self) -> SideEffectFlags {
        self.effect_tag
    }

    #[inline]
    pub fn expiration_time(&self) -> ExpirationTime {
        self.expiration_time
    }

    #[inline]
    pub fn child_expiration_time(&self) -> ExpirationTime {
        self.child_expiration_time
    }

    #[inline]
    pub fn next_effect(&self) -> Option<FiberId> {
        self.next_effect
    }

    #[inline]
    pub fn first_effect(&self) -> Option<FiberId> {
        self.first_effect
    }

    #[inline]
    pub fn last_effect(&self) -> Option<FiberId> {
        self.last_effect
    }

    #[inline]
    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    /// Host tag of a host component fiber.
    pub fn host_tag(&self) -> Option<&str> {
        self.element_type.as_ref().and_then(ElementType::host_tag)
    }

    /// Whether the fiber has no pending effects and an empty effect list.
    pub fn has_clean_effects(&self) -> bool {
        self.effect_tag.is_empty()
            && self.next_effect.is_none()
            && self.first_effect.is_none()
            && self.last_effect.is_none()
    }

    // -- Mutators used by begin/complete handlers --

    /// Record props used to produce the current output.
    pub fn set_memoized_props(
        &mut self,
        props: Value,
    ) {
        self.memoized_props = props;
    }

    /// Overwrite the materialized state.
    pub fn set_memoized_state(
        &mut self,
        state: Value,
    ) {
        self.memoized_state = state;
    }

    /// Overwrite the pending props.
    pub fn set_pending_props(
        &mut self,
        props: Value,
    ) {
        self.pending_props = props;
    }

    /// Attach host-specific state.
    pub fn set_state_node(
        &mut self,
        state_node: StateNode,
    ) {
        self.state_node = Some(state_node);
    }

    /// Attach a ref.
    pub fn set_ref_value(
        &mut self,
        ref_value: Option<Value>,
    ) {
        self.ref_value = ref_value;
    }

    /// Add side-effect flags.
    pub fn insert_effect(
        &mut self,
        flags: SideEffectFlags,
    ) {
        self.effect_tag |= flags;
    }

    /// Clear side-effect flags.
    pub fn remove_effect(
        &mut self,
        flags: SideEffectFlags,
    ) {
        self.effect_tag &= !flags;
    }

    /// Set the pending priority of this fiber.
    pub fn set_expiration_time(
        &mut self,
        expiration_time: ExpirationTime,
    ) {
        self.expiration_time = expiration_time;
    }

    /// Set the most urgent pending priority in the subtree.
    pub fn set_child_expiration_time(
        &mut self,
        expiration_time: ExpirationTime,
    ) {
        self.child_expiration_time = expiration_time;
    }
}

impl fmt::Debug for Fiber {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Fiber")
            .field("tag", &self.tag)
            .field("key", &self.key)
            .field("element_type", &self.element_type)
            .field("mode", &self.mode)
            .field("effect_tag", &self.effect_tag)
            .field("expiration_time", &self.expiration_time)
            .field("parent", &self.parent)
            .field("child", &self.child)
            .field("sibling", &self.sibling)
            .field("alternate", &self.alternate)
            .finish()
    }
}
