//! Priority-filtered update queues
//!
//! Every fiber that holds state owns an [`UpdateQueue`]: a base state plus an
//! insertion-ordered list of pending [`Update`]s. A fiber and its alternate
//! usually hold distinct queue objects that share the same update records,
//! so an update appended once is seen by both buffers. Before a queue is
//! mutated on the work-in-progress side it is cloned
//! ([`ensure_work_in_progress_queue_is_a_clone`]) so the committed queue is
//! never touched by a pass that may be abandoned.
//!
//! Processing walks the list in order. Updates whose priority does not
//! qualify for the pass are left in place together with everything after
//! them, and the base state is rebased to the result just before the first
//! skipped update. Replaying the remainder later therefore yields the same
//! final state as applying everything in one pass.

pub mod update;

pub use update::{Update, UpdateRef, UpdateTag};

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::error::{ReconcileError, ReconcileResult};
use crate::fiber::{ExpirationTime, FiberArena, FiberId, SideEffectFlags};
use crate::value::Value;

/// Shared handle to a queue.
pub type QueueRef = Rc<RefCell<UpdateQueue>>;

/// Pending updates of one fiber.
#[derive(Debug, Clone, Default)]
pub struct UpdateQueue {
    base_state: Value,

    first_update: Option<UpdateRef>,
    last_update: Option<UpdateRef>,

    first_captured_update: Option<UpdateRef>,
    last_captured_update: Option<UpdateRef>,

    first_effect: Option<UpdateRef>,
    last_effect: Option<UpdateRef>,

    first_captured_effect: Option<UpdateRef>,
    last_captured_effect: Option<UpdateRef>,
}

/// Per-pass processing flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessState {
    /// A `ForceUpdate` was applied during the last processing call.
    pub has_force_update: bool,
}

impl ProcessState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the flag before a fresh begin phase.
    pub fn reset(&mut self) {
        self.has_force_update = false;
    }
}

impl UpdateQueue {
    /// Empty queue over `base_state`.
    pub fn new(base_state: Value) -> Self {
        Self {
            base_state,
            ..Self::default()
        }
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> QueueRef {
        Rc::new(RefCell::new(self))
    }

    /// Shallow clone: same base state and update list, empty captured and
    /// effect lists.
    fn clone_shallow(&self) -> Self {
        Self {
            base_state: self.base_state.clone(),
            first_update: self.first_update.clone(),
            last_update: self.last_update.clone(),
            ..Self::default()
        }
    }

    /// State before the first pending update.
    pub fn base_state(&self) -> &Value {
        &self.base_state
    }

    pub fn first_update(&self) -> Option<&UpdateRef> {
        self.first_update.as_ref()
    }

    pub fn last_update(&self) -> Option<&UpdateRef> {
        self.last_update.as_ref()
    }

    pub fn first_captured_update(&self) -> Option<&UpdateRef> {
        self.first_captured_update.as_ref()
    }

    /// Whether both update lists are empty.
    pub fn is_empty(&self) -> bool {
        self.first_update.is_none() && self.first_captured_update.is_none()
    }

    /// Updates of the normal list, in order.
    pub fn updates(&self) -> Vec<UpdateRef> {
        collect_list(self.first_update.as_ref(), self.last_update.as_ref(), Update::next)
    }

    /// Updates of the captured list, in order.
    pub fn captured_updates(&self) -> Vec<UpdateRef> {
        collect_list(
            self.first_captured_update.as_ref(),
            self.last_captured_update.as_ref(),
            Update::next,
        )
    }

    /// Updates waiting on the normal effect list, in order.
    pub fn effects(&self) -> Vec<UpdateRef> {
        collect_list(self.first_effect.as_ref(), self.last_effect.as_ref(), Update::next_effect)
    }

    /// Updates waiting on the captured effect list, in order.
    pub fn captured_effects(&self) -> Vec<UpdateRef> {
        collect_list(
            self.first_captured_effect.as_ref(),
            self.last_captured_effect.as_ref(),
            Update::next_effect,
        )
    }

    fn append_update(
        &mut self,
        update: &UpdateRef,
    ) {
        match &self.last_update {
            Some(last) => last.set_next(Some(update.clone())),
            None => self.first_update = Some(update.clone()),
        }
        self.last_update = Some(update.clone());
    }

    fn append_captured_update(
        &mut self,
        update: &UpdateRef,
    ) {
        match &self.last_captured_update {
            Some(last) => last.set_next(Some(update.clone())),
            None => self.first_captured_update = Some(update.clone()),
        }
        self.last_captured_update = Some(update.clone());
    }

    fn append_effect(
        &mut self,
        update: &UpdateRef,
    ) {
        if list_contains(self.first_effect.as_ref(), self.last_effect.as_ref(), update) {
            return;
        }
        update.set_next_effect(None);
        match &self.last_effect {
            Some(last) => last.set_next_effect(Some(update.clone())),
            None => self.first_effect = Some(update.clone()),
        }
        self.last_effect = Some(update.clone());
    }

    fn append_captured_effect(
        &mut self,
        update: &UpdateRef,
    ) {
        if list_contains(
            self.first_captured_effect.as_ref(),
            self.last_captured_effect.as_ref(),
            update,
        ) {
            return;
        }
        update.set_next_effect(None);
        match &self.last_captured_effect {
            Some(last) => last.set_next_effect(Some(update.clone())),
            None => self.first_captured_effect = Some(update.clone()),
        }
        self.last_captured_effect = Some(update.clone());
    }
}

fn collect_list(
    first: Option<&UpdateRef>,
    last: Option<&UpdateRef>,
    link: fn(&Update) -> Option<UpdateRef>,
) -> Vec<UpdateRef> {
    let mut out = Vec::new();
    let mut cursor = first.cloned();
    while let Some(update) = cursor {
        let done = last.is_some_and(|l| Rc::ptr_eq(l, &update));
        cursor = if done { None } else { link(&update) };
        out.push(update);
    }
    out
}

/// Whether `update` is already on the effect list `first..=last`.
fn list_contains(
    first: Option<&UpdateRef>,
    last: Option<&UpdateRef>,
    update: &UpdateRef,
) -> bool {
    let mut cursor = first.cloned();
    while let Some(entry) = cursor {
        if Rc::ptr_eq(&entry, update) {
            return true;
        }
        if last.is_some_and(|l| Rc::ptr_eq(l, &entry)) {
            break;
        }
        cursor = entry.next_effect();
    }
    false
}

fn same_queue(
    a: &QueueRef,
    b: &QueueRef,
) -> bool {
    Rc::ptr_eq(a, b)
}

// ============================================================================
// Enqueueing
// ============================================================================

/// Append `update` to every queue representing `fiber`'s position: its own
/// queue and its alternate's. Missing queues are created from the owning
/// fiber's memoized state.
pub fn enqueue_update(
    arena: &mut FiberArena,
    fiber: FiberId,
    update: UpdateRef,
) -> ReconcileResult<()> {
    let node = arena.get(fiber)?;
    let alternate = node.alternate().filter(|alt| arena.contains(*alt));

    let (queue1, queue2) = match alternate {
        None => {
            let queue = match node.update_queue() {
                Some(queue) => queue.clone(),
                None => {
                    let queue = UpdateQueue::new(node.memoized_state().clone()).into_ref();
                    arena.get_mut(fiber)?.update_queue = Some(queue.clone());
                    queue
                }
            };
            (queue, None)
        }
        Some(alt) => {
            let own = node.update_queue().cloned();
            let other = arena.get(alt)?.update_queue().cloned();
            match (own, other) {
                (None, None) => {
                    let q1 = UpdateQueue::new(arena.get(fiber)?.memoized_state().clone()).into_ref();
                    let q2 = UpdateQueue::new(arena.get(alt)?.memoized_state().clone()).into_ref();
                    arena.get_mut(fiber)?.update_queue = Some(q1.clone());
                    arena.get_mut(alt)?.update_queue = Some(q2.clone());
                    (q1, Some(q2))
                }
                (None, Some(q2)) => {
                    let q1 = q2.borrow().clone_shallow().into_ref();
                    arena.get_mut(fiber)?.update_queue = Some(q1.clone());
                    (q1, Some(q2))
                }
                (Some(q1), None) => {
                    let q2 = q1.borrow().clone_shallow().into_ref();
                    arena.get_mut(alt)?.update_queue = Some(q2.clone());
                    (q1, Some(q2))
                }
                (Some(q1), Some(q2)) => (q1, Some(q2)),
            }
        }
    };

    match queue2 {
        Some(queue2) if !same_queue(&queue1, &queue2) => {
            let mut q1 = queue1.borrow_mut();
            let mut q2 = queue2.borrow_mut();
            let shared_tail = match (&q1.last_update, &q2.last_update) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                _ => false,
            };
            if shared_tail {
                // One record ends both lists; append once, advance the other.
                q1.append_update(&update);
                q2.last_update = Some(update.clone());
            } else {
                q1.append_update(&update);
                q2.append_update(&update);
            }
        }
        _ => queue1.borrow_mut().append_update(&update),
    }

    trace!(fiber = %fiber, expiration = %update.expiration_time, tag = ?update.tag, "enqueued update");
    Ok(())
}

/// Append an engine-injected update to the work-in-progress captured list
/// only. Captured updates never reach the alternate, so they vanish if the
/// pass is abandoned.
pub fn enqueue_captured_update(
    arena: &mut FiberArena,
    wip: FiberId,
    update: UpdateRef,
) -> ReconcileResult<()> {
    let node = arena.get(wip)?;
    debug_assert!(
        node.tag().accepts_capture_updates(),
        "capture updates target class components and host roots only, got {:?}",
        node.tag()
    );

    let queue = match node.update_queue().cloned() {
        None => {
            let queue = UpdateQueue::new(node.memoized_state().clone()).into_ref();
            arena.get_mut(wip)?.update_queue = Some(queue.clone());
            queue
        }
        Some(queue) => ensure_work_in_progress_queue_is_a_clone(arena, wip, queue)?,
    };

    assert_not_shared(arena, wip, &queue)?;
    queue.borrow_mut().append_captured_update(&update);
    trace!(fiber = %wip, expiration = %update.expiration_time, "enqueued captured update");
    Ok(())
}

/// Clone `queue` onto `wip` if it is still the alternate's queue object.
pub fn ensure_work_in_progress_queue_is_a_clone(
    arena: &mut FiberArena,
    wip: FiberId,
    queue: QueueRef,
) -> ReconcileResult<QueueRef> {
    let current = arena.get(wip)?.alternate();
    let shared = match current.and_then(|c| arena.get(c).ok()) {
        Some(current) => current.update_queue().is_some_and(|q| same_queue(q, &queue)),
        None => false,
    };
    if !shared {
        return Ok(queue);
    }

    let clone = queue.borrow().clone_shallow().into_ref();
    arena.get_mut(wip)?.update_queue = Some(clone.clone());
    trace!(fiber = %wip, "cloned shared update queue");
    Ok(clone)
}

fn assert_not_shared(
    arena: &FiberArena,
    wip: FiberId,
    queue: &QueueRef,
) -> ReconcileResult<()> {
    if !arena.assert_queue_clones() {
        return Ok(());
    }
    if let Some(current) = arena.get(wip)?.alternate() {
        let shared = arena
            .get(current)
            .ok()
            .and_then(|c| c.update_queue())
            .is_some_and(|q| same_queue(q, queue));
        assert!(
            !shared,
            "update queue of {} is mutated while shared with its alternate",
            wip
        );
    }
    Ok(())
}

// ============================================================================
// Processing
// ============================================================================

fn get_state_from_update(
    arena: &mut FiberArena,
    wip: FiberId,
    update: &Update,
    prev_state: &Value,
    props: &Value,
    instance: &Value,
    state: &mut ProcessState,
) -> ReconcileResult<Value> {
    let resolve = |payload: &Value| match payload {
        Value::Function(f) => f.call(&[prev_state.clone(), props.clone(), instance.clone()]),
        other => other.clone(),
    };

    let next = match update.tag {
        UpdateTag::ReplaceState => resolve(&update.payload),
        UpdateTag::CaptureUpdate | UpdateTag::UpdateState => {
            if update.tag == UpdateTag::CaptureUpdate {
                let fiber = arena.get_mut(wip)?;
                fiber.effect_tag =
                    (fiber.effect_tag & !SideEffectFlags::SHOULD_CAPTURE) | SideEffectFlags::DID_CAPTURE;
            }
            let partial = resolve(&update.payload);
            if partial.is_null() {
                prev_state.clone()
            } else {
                prev_state.merge(&partial)
            }
        }
        UpdateTag::ForceUpdate => {
            state.has_force_update = true;
            prev_state.clone()
        }
    };
    Ok(next)
}

/// Which list a walk is over.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Normal,
    Captured,
}

/// Collapse the pending updates of `wip` that qualify for
/// `render_expiration` into its memoized state.
///
/// Skipped updates (and everything after the first of them) stay queued;
/// the fiber's `expiration_time` becomes the most urgent skipped priority,
/// or `NO_WORK` when everything was applied.
pub fn process_update_queue(
    arena: &mut FiberArena,
    wip: FiberId,
    props: &Value,
    instance: &Value,
    render_expiration: ExpirationTime,
    state: &mut ProcessState,
) -> ReconcileResult<()> {
    state.has_force_update = false;

    let Some(queue) = arena.get(wip)?.update_queue().cloned() else {
        return Ok(());
    };
    let queue = ensure_work_in_progress_queue_is_a_clone(arena, wip, queue)?;
    assert_not_shared(arena, wip, &queue)?;
    let mut queue = queue.borrow_mut();

    let mut new_base_state = queue.base_state.clone();
    let mut new_expiration = ExpirationTime::NO_WORK;
    let mut result_state = new_base_state.clone();
    let mut needs_callback_effect = false;

    // Normal list.
    let mut new_first_update: Option<UpdateRef> = None;
    let mut cursor = queue.first_update.clone();
    while let Some(update) = cursor {
        if !update.expiration_time.qualifies_for(render_expiration) {
            if new_first_update.is_none() {
                new_first_update = Some(update.clone());
                new_base_state = result_state.clone();
            }
            new_expiration = new_expiration.most_urgent(update.expiration_time);
            trace!(fiber = %wip, expiration = %update.expiration_time, "skipped update");
        } else {
            result_state =
                get_state_from_update(arena, wip, &update, &result_state, props, instance, state)?;
            if update.has_callback() {
                needs_callback_effect = true;
                queue.append_update_effect(&update, ListKind::Normal);
            }
            trace!(fiber = %wip, expiration = %update.expiration_time, "applied update");
        }
        if queue.last_update.as_ref().is_some_and(|l| Rc::ptr_eq(l, &update)) {
            break;
        }
        cursor = update.next();
    }

    // Captured list. A skip here only rebases when the normal list did not.
    let mut new_first_captured: Option<UpdateRef> = None;
    let mut cursor = queue.first_captured_update.clone();
    while let Some(update) = cursor {
        if !update.expiration_time.qualifies_for(render_expiration) {
            if new_first_captured.is_none() {
                new_first_captured = Some(update.clone());
                if new_first_update.is_none() {
                    new_base_state = result_state.clone();
                }
            }
            new_expiration = new_expiration.most_urgent(update.expiration_time);
        } else {
            result_state =
                get_state_from_update(arena, wip, &update, &result_state, props, instance, state)?;
            if update.has_callback() {
                needs_callback_effect = true;
                queue.append_update_effect(&update, ListKind::Captured);
            }
        }
        if queue
            .last_captured_update
            .as_ref()
            .is_some_and(|l| Rc::ptr_eq(l, &update))
        {
            break;
        }
        cursor = update.next();
    }

    if new_first_update.is_none() {
        queue.last_update = None;
    }
    if new_first_captured.is_none() {
        queue.last_captured_update = None;
    } else {
        needs_callback_effect = true;
    }
    if new_first_update.is_none() && new_first_captured.is_none() {
        new_base_state = result_state.clone();
    }

    queue.base_state = new_base_state;
    queue.first_update = new_first_update;
    queue.first_captured_update = new_first_captured;
    drop(queue);

    let fiber = arena.get_mut(wip)?;
    if needs_callback_effect {
        fiber.effect_tag |= SideEffectFlags::CALLBACK;
    }
    fiber.expiration_time = new_expiration;
    fiber.memoized_state = result_state;
    Ok(())
}

impl UpdateQueue {
    fn append_update_effect(
        &mut self,
        update: &UpdateRef,
        list: ListKind,
    ) {
        match list {
            ListKind::Normal => self.append_effect(update),
            ListKind::Captured => self.append_captured_effect(update),
        }
    }
}

// ============================================================================
// Commit
// ============================================================================

/// Finish the queue of a committed fiber: splice leftover captured updates
/// onto the normal list, then fire every collected callback with
/// `instance`, normal effects first. Returns the number of callbacks fired.
///
/// A splice rewrites the tail of a list the alternate's queue may still end
/// on, so the alternate's queue is reset to a shallow clone of the result.
///
/// Callbacks are taken out of their update when fired, so an update that is
/// applied again after a rebase never fires twice.
pub fn commit_update_queue(
    arena: &FiberArena,
    finished: FiberId,
    queue: &QueueRef,
    instance: &Value,
) -> ReconcileResult<usize> {
    let mut spliced = false;
    let (normal, captured) = {
        let mut queue = queue.borrow_mut();

        if let Some(first_captured) = queue.first_captured_update.take() {
            spliced = true;
            let last_captured = queue.last_captured_update.take();
            match queue.last_update.take() {
                Some(last) => {
                    last.set_next(Some(first_captured));
                }
                None => {
                    queue.first_update = Some(first_captured);
                }
            }
            queue.last_update = last_captured;
        }

        let normal = queue.effects();
        let captured = queue.captured_effects();
        queue.first_effect = None;
        queue.last_effect = None;
        queue.first_captured_effect = None;
        queue.last_captured_effect = None;
        (normal, captured)
    };

    if spliced {
        sync_alternate_queue(arena, finished, queue)?;
    }

    let mut fired = 0;
    for update in normal.iter().chain(captured.iter()) {
        if let Some(callback) = update.take_callback() {
            match callback {
                Value::Function(f) => {
                    f.call(std::slice::from_ref(instance));
                    fired += 1;
                }
                other => {
                    return Err(ReconcileError::InvalidCallback {
                        found: other.type_name().to_string(),
                    })
                }
            }
        }
    }

    trace!(fiber = %finished, fired, "committed update queue");
    Ok(fired)
}

fn sync_alternate_queue(
    arena: &FiberArena,
    finished: FiberId,
    queue: &QueueRef,
) -> ReconcileResult<()> {
    let Some(alternate) = arena.get(finished)?.alternate() else {
        return Ok(());
    };
    let Some(alternate_queue) = arena.get(alternate).ok().and_then(|f| f.update_queue()) else {
        return Ok(());
    };
    if !same_queue(alternate_queue, queue) {
        let synced = queue.borrow().clone_shallow();
        *alternate_queue.borrow_mut() = synced;
        trace!(fiber = %alternate, "synced alternate queue after splice");
    }
    Ok(())
}

#[cfg(test)]
mod tests;
