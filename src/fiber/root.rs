//! Fiber roots
//!
//! A [`FiberRoot`] owns the `current` pointer of one host container. A pass
//! builds the work-in-progress twin of `current`; committing it swaps the
//! roles of the two buffers, abandoning it leaves `current` untouched.

use tracing::{debug, info};

use super::arena::FiberArena;
use super::expiration::ExpirationTime;
use super::id::FiberId;
use crate::error::ReconcileResult;
use crate::host::HostNodeId;
use crate::util::config::ReconcilerConfig;

/// Root of one rendered tree.
#[derive(Debug, Clone)]
pub struct FiberRoot {
    container: HostNodeId,
    current: FiberId,
    work_in_progress: Option<FiberId>,
    hydrate: bool,
}

impl FiberRoot {
    /// Create the host root fiber for `container`.
    pub fn new(
        arena: &mut FiberArena,
        container: HostNodeId,
        config: &ReconcilerConfig,
    ) -> Self {
        let current = arena.create_host_root_fiber(
            container,
            config.root.concurrent,
            config.profiler.enable_timer,
        );
        info!(root = %current, ?container, "created root");
        Self {
            container,
            current,
            work_in_progress: None,
            hydrate: config.root.hydrate,
        }
    }

    #[inline]
    pub fn container(&self) -> HostNodeId {
        self.container
    }

    /// Committed root fiber.
    #[inline]
    pub fn current(&self) -> FiberId {
        self.current
    }

    /// Root fiber of the pass in progress, if any.
    #[inline]
    pub fn work_in_progress(&self) -> Option<FiberId> {
        self.work_in_progress
    }

    #[inline]
    pub fn hydrate(&self) -> bool {
        self.hydrate
    }

    /// Start (or restart) a pass at `expiration_time`.
    pub fn create_work_in_progress(
        &mut self,
        arena: &mut FiberArena,
        expiration_time: ExpirationTime,
    ) -> ReconcileResult<FiberId> {
        let props = arena.get(self.current)?.pending_props().clone();
        let wip = arena.create_work_in_progress(self.current, props, expiration_time)?;
        self.work_in_progress = Some(wip);
        Ok(wip)
    }

    /// Make `finished` the committed tree. Returns the previous current
    /// root, which becomes the alternate for the next pass.
    pub fn commit(
        &mut self,
        finished: FiberId,
    ) -> FiberId {
        let previous = std::mem::replace(&mut self.current, finished);
        self.work_in_progress = None;
        debug!(current = %finished, %previous, "committed root");
        previous
    }

    /// Drop the pass in progress. Its fibers stay in the arena as alternates
    /// and are refreshed when the next pass starts.
    pub fn abandon(&mut self) -> Option<FiberId> {
        let abandoned = self.work_in_progress.take();
        if let Some(wip) = abandoned {
            debug!(fiber = %wip, "abandoned pass");
        }
        abandoned
    }
}
