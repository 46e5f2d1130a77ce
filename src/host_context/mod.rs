//! Host context stack
//!
//! Threads host-environment context (for documents: the namespace) through
//! a depth-first walk. Three co-indexed stacks are kept: root containers,
//! the fibers that provided a context, and the context values. Every entry
//! remembers the fiber that pushed it, so the matching pop on the way back
//! up is a no-op for fibers that never pushed.

pub mod namespace;

pub use namespace::{Namespace, NamespaceHostConfig, NamespacedContainer};

use std::fmt::Debug;

use smallvec::SmallVec;
use tracing::trace;

use crate::error::{ReconcileError, ReconcileResult};
use crate::fiber::FiberId;

/// Host-specific context derivation.
pub trait HostConfig {
    /// Root container a tree (or portal) renders into.
    type Container: Clone + Debug;
    /// Context value handed to children.
    type Context: Clone + PartialEq + Debug;

    /// Context at the top of a container.
    fn root_host_context(
        &self,
        container: &Self::Container,
    ) -> Self::Context;

    /// Context for the children of an element `tag` inside `parent`.
    fn child_host_context(
        &self,
        parent: &Self::Context,
        tag: &str,
        root: &Self::Container,
    ) -> Self::Context;
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fiber: FiberId,
}

/// Context stack for one traversal.
#[derive(Debug)]
pub struct HostContextStack<H: HostConfig> {
    config: H,
    containers: SmallVec<[Entry<H::Container>; 2]>,
    context_fibers: SmallVec<[FiberId; 8]>,
    contexts: SmallVec<[Entry<H::Context>; 8]>,
}

impl<H: HostConfig> HostContextStack<H> {
    pub fn new(config: H) -> Self {
        Self {
            config,
            containers: SmallVec::new(),
            context_fibers: SmallVec::new(),
            contexts: SmallVec::new(),
        }
    }

    pub fn config(&self) -> &H {
        &self.config
    }

    /// Enter a root scope (host root or portal). Always pushes all three
    /// stacks.
    pub fn push_host_container(
        &mut self,
        fiber: FiberId,
        container: H::Container,
    ) {
        let context = self.config.root_host_context(&container);
        trace!(fiber = %fiber, ?container, ?context, "push host container");
        self.containers.push(Entry {
            value: container,
            fiber,
        });
        self.context_fibers.push(fiber);
        self.contexts.push(Entry {
            value: context,
            fiber,
        });
    }

    /// Leave the root scope entered by `fiber`. A no-op unless `fiber` owns
    /// the top container entry.
    pub fn pop_host_container(
        &mut self,
        fiber: FiberId,
    ) -> bool {
        if self.containers.last().map(|e| e.fiber) != Some(fiber) {
            trace!(fiber = %fiber, "pop host container skipped");
            return false;
        }
        self.pop_context_entries(fiber);
        self.containers.pop();
        trace!(fiber = %fiber, "pop host container");
        true
    }

    /// Enter a host element `tag` rendered by `fiber`. Pushes only when the
    /// child context differs from the current one.
    pub fn push_host_context(
        &mut self,
        fiber: FiberId,
        tag: &str,
    ) -> ReconcileResult<bool> {
        let root = self.root_host_container()?;
        let context = self.host_context()?;
        let next = self.config.child_host_context(context, tag, root);
        if *context == next {
            return Ok(false);
        }
        trace!(fiber = %fiber, tag, ?next, "push host context");
        self.context_fibers.push(fiber);
        self.contexts.push(Entry { value: next, fiber });
        Ok(true)
    }

    /// Leave the host element rendered by `fiber`. A no-op unless `fiber`
    /// provided the current context.
    pub fn pop_host_context(
        &mut self,
        fiber: FiberId,
    ) -> bool {
        if self.context_fibers.last() != Some(&fiber) {
            return false;
        }
        self.pop_context_entries(fiber);
        trace!(fiber = %fiber, "pop host context");
        true
    }

    fn pop_context_entries(
        &mut self,
        fiber: FiberId,
    ) {
        if self.contexts.last().map(|e| e.fiber) == Some(fiber) {
            self.contexts.pop();
        }
        if self.context_fibers.last() == Some(&fiber) {
            self.context_fibers.pop();
        }
    }

    /// Container of the innermost root scope.
    pub fn root_host_container(&self) -> ReconcileResult<&H::Container> {
        self.containers
            .last()
            .map(|e| &e.value)
            .ok_or(ReconcileError::MissingHostContext)
    }

    /// Context of the innermost host element.
    pub fn host_context(&self) -> ReconcileResult<&H::Context> {
        self.contexts
            .last()
            .map(|e| &e.value)
            .ok_or(ReconcileError::MissingHostContext)
    }

    /// Fiber that provided the current context.
    pub fn context_fiber(&self) -> Option<FiberId> {
        self.context_fibers.last().copied()
    }

    /// Number of context entries.
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.contexts.is_empty()
    }

    /// Drop everything, e.g. after an interrupted pass.
    pub fn reset(&mut self) {
        self.containers.clear();
        self.context_fibers.clear();
        self.contexts.clear();
    }
}
