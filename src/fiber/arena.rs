//! Fiber arena
//!
//! Both trees (current and work-in-progress) live in one [`FiberArena`].
//! Every link between fibers, including the alternate link, is a
//! [`FiberId`] into the same arena, so neither tree owns the other and an
//! abandoned work-in-progress fiber simply stays behind as the alternate
//! of its current twin until the next pass reuses it.

use std::rc::Rc;

use hashbrown::HashSet;
use slotmap::SlotMap;
use tracing::{debug, trace};

use super::element::ContextId;
use super::expiration::ExpirationTime;
use super::id::FiberId;
use super::node::{ContextDependencies, ContextDependency, Fiber};
use super::tag::{FiberTag, ModeFlags, SideEffectFlags};
use crate::error::{ReconcileError, ReconcileResult};
use crate::util::config::ReconcilerConfig;
use crate::value::Value;

/// Storage for every fiber of one engine instance.
#[derive(Debug)]
pub struct FiberArena {
    fibers: SlotMap<FiberId, Fiber>,
    allocations: usize,
    assert_queue_clones: bool,
}

/// Fields refreshed from `current` on every `create_work_in_progress`.
struct Carried {
    child_expiration_time: ExpirationTime,
    expiration_time: ExpirationTime,
    child: Option<FiberId>,
    memoized_props: Value,
    memoized_state: Value,
    update_queue: Option<crate::update_queue::QueueRef>,
    context_dependencies: Option<Rc<ContextDependencies>>,
    sibling: Option<FiberId>,
    index: usize,
    parent: Option<FiberId>,
    ref_value: Option<Value>,
}

impl Carried {
    fn from_fiber(fiber: &Fiber) -> Self {
        Self {
            child_expiration_time: fiber.child_expiration_time,
            expiration_time: fiber.expiration_time,
            child: fiber.child,
            memoized_props: fiber.memoized_props.clone(),
            memoized_state: fiber.memoized_state.clone(),
            update_queue: fiber.update_queue.clone(),
            context_dependencies: fiber.context_dependencies.clone(),
            sibling: fiber.sibling,
            index: fiber.index,
            parent: fiber.parent,
            ref_value: fiber.ref_value.clone(),
        }
    }

    fn apply(
        self,
        fiber: &mut Fiber,
    ) {
        fiber.child_expiration_time = self.child_expiration_time;
        fiber.expiration_time = self.expiration_time;
        fiber.child = self.child;
        fiber.memoized_props = self.memoized_props;
        fiber.memoized_state = self.memoized_state;
        fiber.update_queue = self.update_queue;
        fiber.context_dependencies = self.context_dependencies;
        // Provisional; the parent's reconciliation overwrites these.
        fiber.sibling = self.sibling;
        fiber.index = self.index;
        fiber.parent = self.parent;
        fiber.ref_value = self.ref_value;
    }
}

impl Default for FiberArena {
    fn default() -> Self {
        Self::new()
    }
}

impl FiberArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            fibers: SlotMap::with_key(),
            allocations: 0,
            assert_queue_clones: cfg!(debug_assertions),
        }
    }

    /// Create an empty arena honouring the `[debug]` settings.
    pub fn from_config(config: &ReconcilerConfig) -> Self {
        Self {
            assert_queue_clones: config.debug.assert_queue_clones,
            ..Self::new()
        }
    }

    /// Whether shared-queue mutation checks are enabled.
    #[inline]
    pub fn assert_queue_clones(&self) -> bool {
        self.assert_queue_clones
    }

    /// Number of live fibers.
    #[inline]
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    /// Whether the arena holds no fibers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Total fibers ever allocated by this arena.
    #[inline]
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Whether `id` refers to a live fiber.
    #[inline]
    pub fn contains(
        &self,
        id: FiberId,
    ) -> bool {
        self.fibers.contains_key(id)
    }

    /// Borrow a fiber.
    pub fn get(
        &self,
        id: FiberId,
    ) -> ReconcileResult<&Fiber> {
        self.fibers.get(id).ok_or(ReconcileError::StaleFiber(id))
    }

    /// Mutably borrow a fiber.
    pub fn get_mut(
        &mut self,
        id: FiberId,
    ) -> ReconcileResult<&mut Fiber> {
        self.fibers.get_mut(id).ok_or(ReconcileError::StaleFiber(id))
    }

    // ========================================================================
    // Creation and double buffering
    // ========================================================================

    /// Allocate a fresh fiber.
    pub fn create_fiber(
        &mut self,
        tag: FiberTag,
        pending_props: Value,
        key: Option<std::sync::Arc<str>>,
        mode: ModeFlags,
    ) -> FiberId {
        self.allocations += 1;
        let id = self.fibers.insert(Fiber::new(tag, pending_props, key, mode));
        debug!(fiber = %id, ?tag, ?mode, "created fiber");
        id
    }

    /// Return the alternate of `current`, refreshed for a new pass, creating
    /// it on first use.
    ///
    /// A reused alternate has its effect tag and effect list cleared so that
    /// nothing recorded by an abandoned pass leaks into the new one.
    pub fn create_work_in_progress(
        &mut self,
        current: FiberId,
        pending_props: Value,
        expiration_time: ExpirationTime,
    ) -> ReconcileResult<FiberId> {
        let source = self.get(current)?;
        let carried = Carried::from_fiber(source);
        let alternate = source.alternate.filter(|alt| self.fibers.contains_key(*alt));

        let wip = match alternate {
            Some(alt) => {
                let fiber = &mut self.fibers[alt];
                fiber.pending_props = pending_props;
                fiber.effect_tag = SideEffectFlags::NO_EFFECT;
                fiber.next_effect = None;
                fiber.first_effect = None;
                fiber.last_effect = None;
                trace!(fiber = %alt, current = %current, %expiration_time, "reusing alternate");
                alt
            }
            None => {
                let (tag, key, mode) = (source.tag, source.key.clone(), source.mode);
                let element_type = source.element_type.clone();
                let resolved_type = source.resolved_type.clone();
                let state_node = source.state_node.clone();

                let alt = self.create_fiber(tag, pending_props, key, mode);
                let fiber = &mut self.fibers[alt];
                fiber.element_type = element_type;
                fiber.resolved_type = resolved_type;
                fiber.state_node = state_node;
                fiber.alternate = Some(current);
                self.fibers[current].alternate = Some(alt);
                debug!(fiber = %alt, current = %current, %expiration_time, "created alternate");
                alt
            }
        };

        carried.apply(&mut self.fibers[wip]);
        Ok(wip)
    }

    /// Replace the child list of `wip` with work-in-progress twins of the
    /// current children. Used when a fiber bails out but its subtree still
    /// has pending work.
    pub fn clone_child_fibers(
        &mut self,
        wip: FiberId,
    ) -> ReconcileResult<()> {
        let mut current_child = match self.get(wip)?.child {
            Some(child) => child,
            None => return Ok(()),
        };

        let mut previous: Option<FiberId> = None;
        loop {
            let (props, expiration, next) = {
                let child = self.get(current_child)?;
                (child.pending_props.clone(), child.expiration_time, child.sibling)
            };
            let new_child = self.create_work_in_progress(current_child, props, expiration)?;
            self.fibers[new_child].parent = Some(wip);
            match previous {
                Some(prev) => self.fibers[prev].sibling = Some(new_child),
                None => self.fibers[wip].child = Some(new_child),
            }
            previous = Some(new_child);

            match next {
                Some(sibling) => current_child = sibling,
                None => break,
            }
        }

        if let Some(last) = previous {
            self.fibers[last].sibling = None;
        }
        Ok(())
    }

    /// Record that `fiber` has work at `expiration_time` and fold that
    /// priority into `child_expiration_time` of every ancestor, on both
    /// buffers. Returns the host root reached, if any.
    pub fn schedule_work(
        &mut self,
        fiber: FiberId,
        expiration_time: ExpirationTime,
    ) -> ReconcileResult<Option<FiberId>> {
        let target = self.get_mut(fiber)?;
        target.expiration_time = target.expiration_time.most_urgent(expiration_time);
        let mut alternate = target.alternate;
        let mut node_parent = target.parent;
        let mut root = (target.tag == FiberTag::HostRoot).then_some(fiber);

        if let Some(alt) = alternate.and_then(|alt| self.fibers.get_mut(alt)) {
            alt.expiration_time = alt.expiration_time.most_urgent(expiration_time);
        }

        while let Some(parent) = node_parent {
            let node = self.get_mut(parent)?;
            node.child_expiration_time = node.child_expiration_time.most_urgent(expiration_time);
            alternate = node.alternate;
            node_parent = node.parent;
            if node.tag == FiberTag::HostRoot {
                root = Some(parent);
            }
            if let Some(alt) = alternate.and_then(|alt| self.fibers.get_mut(alt)) {
                alt.child_expiration_time = alt.child_expiration_time.most_urgent(expiration_time);
            }
        }

        trace!(fiber = %fiber, %expiration_time, ?root, "scheduled work");
        Ok(root)
    }

    // ========================================================================
    // Topology
    // ========================================================================

    /// Make `children` the child list of `parent`, in order.
    pub fn link_children(
        &mut self,
        parent: FiberId,
        children: &[FiberId],
    ) -> ReconcileResult<()> {
        for &child in children {
            self.get(child)?;
        }
        self.get_mut(parent)?.child = children.first().copied();
        for (index, &child) in children.iter().enumerate() {
            let fiber = &mut self.fibers[child];
            fiber.parent = Some(parent);
            fiber.index = index;
            fiber.sibling = children.get(index + 1).copied();
        }
        Ok(())
    }

    /// Iterate the child list of `parent`.
    pub fn children(
        &self,
        parent: FiberId,
    ) -> Siblings<'_> {
        Siblings {
            arena: self,
            next: self.fibers.get(parent).and_then(|f| f.child),
        }
    }

    /// Remove `fiber`, its descendants and the alternates of all of them.
    /// The fiber is first unlinked from its parent's child list. Returns the
    /// number of fibers removed.
    pub fn remove_subtree(
        &mut self,
        fiber: FiberId,
    ) -> ReconcileResult<usize> {
        let alternate = self.get(fiber)?.alternate;
        self.detach_from_parent(fiber);
        if let Some(alt) = alternate {
            self.detach_from_parent(alt);
        }

        let mut visited: HashSet<FiberId> = HashSet::new();
        let mut stack = vec![fiber];
        stack.extend(alternate);

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.fibers.get(id) else {
                continue;
            };
            stack.extend(node.alternate);
            let mut child = node.child;
            while let Some(c) = child {
                stack.push(c);
                child = self.fibers.get(c).and_then(|f| f.sibling);
            }
        }

        let mut removed = 0;
        for id in visited {
            if self.fibers.remove(id).is_some() {
                removed += 1;
            }
        }
        debug!(fiber = %fiber, removed, "removed subtree");
        Ok(removed)
    }

    fn detach_from_parent(
        &mut self,
        fiber: FiberId,
    ) {
        let Some(node) = self.fibers.get(fiber) else {
            return;
        };
        let (parent, sibling) = (node.parent, node.sibling);
        let Some(parent) = parent else {
            return;
        };
        let Some(first_child) = self.fibers.get(parent).map(|p| p.child) else {
            return;
        };

        if first_child == Some(fiber) {
            self.fibers[parent].child = sibling;
            return;
        }
        let mut cursor = first_child;
        while let Some(id) = cursor {
            let next = self.fibers.get(id).and_then(|f| f.sibling);
            if next == Some(fiber) {
                self.fibers[id].sibling = sibling;
                return;
            }
            cursor = next;
        }
    }

    // ========================================================================
    // Effect list
    // ========================================================================

    /// Append the effect list of a completed fiber, then the fiber itself if
    /// it has effects beyond `PERFORMED_WORK`, to its parent's effect list.
    pub fn complete_effects(
        &mut self,
        fiber: FiberId,
    ) -> ReconcileResult<()> {
        let node = self.get(fiber)?;
        let (first, last, tag) = (node.first_effect, node.last_effect, node.effect_tag);
        let Some(parent) = node.parent else {
            return Ok(());
        };

        let parent_first = self.get(parent)?.first_effect;
        if parent_first.is_none() {
            self.fibers[parent].first_effect = first;
        }
        if let Some(last) = last {
            let parent_last = self.fibers[parent].last_effect;
            if let Some(parent_last) = parent_last {
                self.get_mut(parent_last)?.next_effect = first;
            }
            self.fibers[parent].last_effect = Some(last);
        }

        if tag.bits() > SideEffectFlags::PERFORMED_WORK.bits() {
            let parent_last = self.fibers[parent].last_effect;
            match parent_last {
                Some(parent_last) => self.get_mut(parent_last)?.next_effect = Some(fiber),
                None => self.fibers[parent].first_effect = Some(fiber),
            }
            self.fibers[parent].last_effect = Some(fiber);
        }
        Ok(())
    }

    /// Iterate the effect list collected on `root`.
    pub fn effects(
        &self,
        root: FiberId,
    ) -> Effects<'_> {
        Effects {
            arena: self,
            next: self.fibers.get(root).and_then(|f| f.first_effect),
        }
    }

    // ========================================================================
    // Resolution and context reads
    // ========================================================================

    /// Settle the kind of an indeterminate fiber after its first render,
    /// on both buffers.
    pub fn resolve_indeterminate(
        &mut self,
        fiber: FiberId,
        tag: FiberTag,
    ) -> ReconcileResult<()> {
        let node = self.get(fiber)?;
        let allowed = node.tag == FiberTag::IndeterminateComponent
            && matches!(tag, FiberTag::FunctionComponent | FiberTag::ClassComponent);
        if !allowed {
            return Err(ReconcileError::InvalidTagResolution { fiber, tag });
        }
        let alternate = node.alternate;
        self.fibers[fiber].tag = tag;
        if let Some(alt) = alternate.and_then(|alt| self.fibers.get_mut(alt)) {
            alt.tag = tag;
        }
        debug!(fiber = %fiber, ?tag, "resolved indeterminate component");
        Ok(())
    }

    /// Append a context read to the fiber's dependency list. A list still
    /// shared with the alternate is copied first.
    pub fn record_context_dependency(
        &mut self,
        fiber: FiberId,
        context: ContextId,
        observed_bits: u32,
    ) -> ReconcileResult<()> {
        let node = self.get_mut(fiber)?;
        let dependencies = node.context_dependencies.get_or_insert_with(Default::default);
        Rc::make_mut(dependencies).items.push(ContextDependency {
            context,
            observed_bits,
        });
        Ok(())
    }
}

/// Iterator over a sibling chain.
pub struct Siblings<'a> {
    arena: &'a FiberArena,
    next: Option<FiberId>,
}

impl Iterator for Siblings<'_> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let current = self.next?;
        self.next = self.arena.fibers.get(current).and_then(|f| f.sibling);
        Some(current)
    }
}

/// Iterator over an effect list.
pub struct Effects<'a> {
    arena: &'a FiberArena,
    next: Option<FiberId>,
}

impl Iterator for Effects<'_> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let current = self.next?;
        self.next = self.arena.fibers.get(current).and_then(|f| f.next_effect);
        Some(current)
    }
}
