//! Reconciler errors
//!
//! Only structural failures live here. They mean an engine invariant was
//! broken (bad element type, unbracketed host context, corrupted queue) and
//! abort the current unit of work. Advisory problems go through
//! [`Diagnostics`](crate::util::diagnostic::Diagnostics) instead.

use thiserror::Error;

use crate::fiber::{FiberId, FiberTag};

/// Reconciler result
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Reconciler errors
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(
        "Element type is invalid: expected a string (for built-in components) or a \
         class/function (for composite components) but got: {got}.{owner_hint}"
    )]
    InvalidElementType {
        /// Description of the rejected type
        got: String,
        /// Rendered "check the render method of" hint, possibly empty
        owner_hint: String,
    },

    #[error("Expected host context to exist. This error is likely caused by a bug in the reconciler.")]
    MissingHostContext,

    #[error("Invalid argument passed as callback. Expected a function. Instead received: {found}")]
    InvalidCallback {
        /// Type name of the value found in the callback slot
        found: String,
    },

    #[error("{0} is not present in the fiber arena")]
    StaleFiber(FiberId),

    #[error("{fiber} cannot be resolved to {tag:?}")]
    InvalidTagResolution {
        /// Fiber being resolved
        fiber: FiberId,
        /// Requested kind
        tag: FiberTag,
    },
}

impl ReconcileError {
    /// Build an `InvalidElementType` error, naming the owner when known.
    pub fn invalid_element_type(
        got: impl Into<String>,
        owner: Option<&str>,
    ) -> Self {
        let owner_hint = match owner {
            Some(name) => format!("\n\nCheck the render method of `{}`.", name),
            None => String::new(),
        };
        ReconcileError::InvalidElementType {
            got: got.into(),
            owner_hint,
        }
    }
}
