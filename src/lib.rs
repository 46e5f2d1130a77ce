//! Fiber Reconciler
//!
//! Incremental reconciliation core of a declarative UI runtime: a
//! double-buffered tree of work units ("fibers"), per-fiber update queues
//! filtered by priority, a host context stack, and the factory that turns
//! element descriptors into fibers.
//!
//! # Example
//!
//! ```
//! use fiber_reconciler::fiber::{ExpirationTime, FiberArena, FiberRoot};
//! use fiber_reconciler::update_queue::{enqueue_update, process_update_queue, ProcessState, Update};
//! use fiber_reconciler::host::HostNodeId;
//! use fiber_reconciler::util::config::ReconcilerConfig;
//! use fiber_reconciler::Value;
//!
//! let mut arena = FiberArena::new();
//! let mut root = FiberRoot::new(&mut arena, HostNodeId(0), &ReconcilerConfig::default());
//!
//! let update = Update::new(ExpirationTime::SYNC)
//!     .with_payload(Value::map([("count", Value::from(1))]))
//!     .into_ref();
//! enqueue_update(&mut arena, root.current(), update).unwrap();
//!
//! let wip = root.create_work_in_progress(&mut arena, ExpirationTime::SYNC).unwrap();
//! let mut state = ProcessState::new();
//! process_update_queue(&mut arena, wip, &Value::Null, &Value::Null, ExpirationTime::SYNC, &mut state).unwrap();
//! assert_eq!(arena.get(wip).unwrap().memoized_state().get("count"), Some(&Value::from(1)));
//! ```

#![doc(html_root_url = "https://docs.rs/fiber-reconciler")]
#![warn(rust_2018_idioms)]

// Core modules
pub mod fiber;
pub mod host;
pub mod host_context;
pub mod update_queue;

// Data and support
pub mod error;
pub mod replay;
pub mod value;

// Utility modules
pub mod util;

// Re-exports
pub use error::{ReconcileError, ReconcileResult};
pub use value::{Function, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "fiber-reconciler";
