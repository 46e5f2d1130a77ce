//! Fiber handles
//!
//! Fibers live in a [`FiberArena`](super::FiberArena) and are addressed by
//! generational handles. A handle to a removed fiber never aliases a newer
//! fiber that reuses the slot.

use std::fmt;

use slotmap::Key;

slotmap::new_key_type! {
    /// Handle to a fiber in the arena.
    ///
    /// Parent, child, sibling, alternate and effect links are all
    /// `Option<FiberId>`; none of them own the target.
    pub struct FiberId;
}

impl fmt::Display for FiberId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Fiber({:?})", self.data())
    }
}
