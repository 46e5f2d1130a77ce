//! Fiber kinds and flag sets

use bitflags::bitflags;

/// Kind of work a fiber represents.
///
/// The set is closed; traversal code matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiberTag {
    /// Function component, resolved
    FunctionComponent,
    /// Class component
    ClassComponent,
    /// Function component before its first invocation
    IndeterminateComponent,
    /// Root of a host tree
    HostRoot,
    /// Subtree rendered into a different host container
    HostPortal,
    /// Host element (e.g. `div`)
    HostComponent,
    /// Host text node
    HostText,
    /// Fragment wrapper
    Fragment,
    /// Strict / concurrent mode boundary
    Mode,
    /// Context consumer
    ContextConsumer,
    /// Context provider
    ContextProvider,
    /// Forward-ref wrapper
    ForwardRef,
    /// Profiler boundary
    Profiler,
    /// Suspense boundary
    SuspenseComponent,
    /// Memoized component
    MemoComponent,
    /// Memoized plain function component
    SimpleMemoComponent,
    /// Lazily resolved component
    LazyComponent,
}

impl FiberTag {
    /// Host-bearing kinds (those with a host instance or container).
    #[inline]
    pub fn is_host(&self) -> bool {
        matches!(
            self,
            FiberTag::HostRoot | FiberTag::HostPortal | FiberTag::HostComponent | FiberTag::HostText
        )
    }

    /// Application-defined component kinds.
    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            FiberTag::FunctionComponent
                | FiberTag::ClassComponent
                | FiberTag::IndeterminateComponent
                | FiberTag::ForwardRef
                | FiberTag::MemoComponent
                | FiberTag::SimpleMemoComponent
                | FiberTag::LazyComponent
        )
    }

    /// Kinds that carry an update queue with class-style updates.
    #[inline]
    pub fn accepts_capture_updates(&self) -> bool {
        matches!(self, FiberTag::ClassComponent | FiberTag::HostRoot)
    }
}

bitflags! {
    /// Pending host mutations and bookkeeping recorded on a fiber.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SideEffectFlags: u16 {
        /// Nothing to do.
        const NO_EFFECT = 0;
        /// Work was performed; read by tooling only.
        const PERFORMED_WORK = 1 << 0;

        // === Host effects ===

        /// Insert into the host tree.
        const PLACEMENT = 1 << 1;
        /// Update host fields.
        const UPDATE = 1 << 2;
        /// Insert and update.
        const PLACEMENT_AND_UPDATE = Self::PLACEMENT.bits() | Self::UPDATE.bits();
        /// Remove from the host tree.
        const DELETION = 1 << 3;
        /// Reset text content before inserting children.
        const CONTENT_RESET = 1 << 4;
        /// Update-queue callbacks must fire after commit.
        const CALLBACK = 1 << 5;
        /// A capture update was applied during this pass.
        const DID_CAPTURE = 1 << 6;
        /// Attach or detach a ref.
        const REF = 1 << 7;
        /// Read host state before mutation.
        const SNAPSHOT = 1 << 8;
        /// Deferred effect.
        const PASSIVE = 1 << 9;

        // === Masks ===

        /// Effects that run in the lifecycle phase of commit.
        const LIFECYCLE_EFFECT_MASK = Self::UPDATE.bits()
            | Self::CALLBACK.bits()
            | Self::REF.bits()
            | Self::SNAPSHOT.bits()
            | Self::PASSIVE.bits();
        /// Every effect that touches the host.
        const HOST_EFFECT_MASK = (1 << 10) - 1;

        // === Unwind flags ===

        /// Work did not complete.
        const INCOMPLETE = 1 << 10;
        /// Ask the nearest boundary to capture.
        const SHOULD_CAPTURE = 1 << 11;
    }
}

bitflags! {
    /// Mode inherited from the parent at creation; never changes afterwards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModeFlags: u8 {
        /// Legacy synchronous mode.
        const NO_CONTEXT = 0;
        /// Interruptible rendering.
        const CONCURRENT = 1 << 0;
        /// Extra checks in strict subtrees.
        const STRICT = 1 << 1;
        /// Profiler timing is collected.
        const PROFILE = 1 << 2;
    }
}
