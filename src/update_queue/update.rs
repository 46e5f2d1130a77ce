//! Update records
//!
//! An [`Update`] is shared by reference between the queue of a fiber and
//! the queue of its alternate. Its list links live in `RefCell`s so either
//! queue can append behind a shared tail without copying the list.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::fiber::ExpirationTime;
use crate::value::Value;

/// Shared handle to an update.
pub type UpdateRef = Rc<Update>;

/// How an update turns the previous state into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateTag {
    /// Shallow-merge the payload (or the result of calling it) over the state
    UpdateState,
    /// Replace the state with the payload (or the result of calling it)
    ReplaceState,
    /// Leave the state alone but force a re-render
    ForceUpdate,
    /// Mark a captured error as handled, then merge like `UpdateState`
    CaptureUpdate,
}

/// One pending state transition.
pub struct Update {
    pub expiration_time: ExpirationTime,
    pub tag: UpdateTag,
    pub payload: Value,
    pub(crate) callback: RefCell<Option<Value>>,
    pub(crate) next: RefCell<Option<UpdateRef>>,
    pub(crate) next_effect: RefCell<Option<UpdateRef>>,
}

impl Update {
    /// A merge update with no payload.
    pub fn new(expiration_time: ExpirationTime) -> Self {
        Self {
            expiration_time,
            tag: UpdateTag::UpdateState,
            payload: Value::Null,
            callback: RefCell::new(None),
            next: RefCell::new(None),
            next_effect: RefCell::new(None),
        }
    }

    pub fn with_tag(
        mut self,
        tag: UpdateTag,
    ) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_payload(
        mut self,
        payload: impl Into<Value>,
    ) -> Self {
        self.payload = payload.into();
        self
    }

    /// Attach a callback fired after commit. Anything other than a function
    /// is rejected when the callback fires.
    pub fn with_callback(
        self,
        callback: impl Into<Value>,
    ) -> Self {
        *self.callback.borrow_mut() = Some(callback.into());
        self
    }

    /// Wrap in a shared handle for enqueueing.
    pub fn into_ref(self) -> UpdateRef {
        Rc::new(self)
    }

    /// Whether a callback is still waiting to fire.
    pub fn has_callback(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Next update in the list.
    pub fn next(&self) -> Option<UpdateRef> {
        self.next.borrow().clone()
    }

    pub(crate) fn set_next(
        &self,
        next: Option<UpdateRef>,
    ) {
        *self.next.borrow_mut() = next;
    }

    pub(crate) fn next_effect(&self) -> Option<UpdateRef> {
        self.next_effect.borrow().clone()
    }

    pub(crate) fn set_next_effect(
        &self,
        next: Option<UpdateRef>,
    ) {
        *self.next_effect.borrow_mut() = next;
    }

    pub(crate) fn take_callback(&self) -> Option<Value> {
        self.callback.borrow_mut().take()
    }
}

impl fmt::Debug for Update {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Update")
            .field("expiration_time", &self.expiration_time)
            .field("tag", &self.tag)
            .field("payload", &self.payload)
            .field("has_callback", &self.has_callback())
            .finish()
    }
}

// Unlink iteratively so a long list does not recurse once per node.
impl Drop for Update {
    fn drop(&mut self) {
        let mut pending: Vec<UpdateRef> = Vec::new();
        pending.extend(self.next.get_mut().take());
        pending.extend(self.next_effect.get_mut().take());
        while let Some(update) = pending.pop() {
            if let Ok(mut inner) = Rc::try_unwrap(update) {
                pending.extend(inner.next.get_mut().take());
                pending.extend(inner.next_effect.get_mut().take());
            }
        }
    }
}
