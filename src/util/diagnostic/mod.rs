//! Advisory diagnostics
//!
//! Non-fatal problems (malformed attribute names, invalid props on structural
//! elements, unwritable prop values) are reported through a [`Diagnostics`]
//! context owned by one engine instance. Each distinct `(code, cause)` pair
//! is emitted at most once when deduplication is on, so a hot render loop
//! cannot flood the log.
//!
//! # Example
//!
//! ```
//! use fiber_reconciler::util::diagnostic::{DiagnosticCode, Diagnostics};
//!
//! let mut diagnostics = Diagnostics::new();
//! assert!(diagnostics.warn(DiagnosticCode::InvalidAttributeName, "1bad", "Invalid attribute name: `1bad`"));
//! assert!(!diagnostics.warn(DiagnosticCode::InvalidAttributeName, "1bad", "Invalid attribute name: `1bad`"));
//! assert_eq!(diagnostics.len(), 1);
//! ```

use std::fmt;

use hashbrown::HashSet;

use crate::util::config::DiagnosticsConfig;

/// Registered diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// W0001: attribute name fails the XML name grammar
    InvalidAttributeName,
    /// W0002: a value that can never be written to the host (e.g. a function)
    InvalidPropValue,
    /// W0003: profiler props lack `id` or `onRender`
    InvalidProfilerProps,
    /// W0004: a fragment received props other than `children`
    InvalidFragmentProp,
}

impl DiagnosticCode {
    /// Stable code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::InvalidAttributeName => "W0001",
            DiagnosticCode::InvalidPropValue => "W0002",
            DiagnosticCode::InvalidProfilerProps => "W0003",
            DiagnosticCode::InvalidFragmentProp => "W0004",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 错误码
    pub code: DiagnosticCode,
    /// Cause key used for deduplication
    pub cause: String,
    /// 完整消息
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.message)
    }
}

/// Diagnostics context with a warn-once latch.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    dedupe: bool,
    emitted: HashSet<(DiagnosticCode, String)>,
    records: Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Create a deduplicating diagnostics context.
    pub fn new() -> Self {
        Self {
            dedupe: true,
            emitted: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Create a context from configuration.
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        Self {
            dedupe: config.dedupe,
            ..Self::new()
        }
    }

    /// Report a warning. Returns `true` if it was emitted, `false` if the
    /// latch suppressed it.
    pub fn warn(
        &mut self,
        code: DiagnosticCode,
        cause: impl Into<String>,
        message: impl Into<String>,
    ) -> bool {
        let cause = cause.into();
        let message = message.into();
        if self.dedupe && !self.emitted.insert((code, cause.clone())) {
            return false;
        }
        tracing::warn!(code = code.as_str(), "{}", message);
        self.records.push(Diagnostic {
            code,
            cause,
            message,
        });
        true
    }

    /// Whether `(code, cause)` has been emitted.
    pub fn has_emitted(
        &self,
        code: DiagnosticCode,
        cause: &str,
    ) -> bool {
        self.records
            .iter()
            .any(|d| d.code == code && d.cause == cause)
    }

    /// Count of diagnostics with the given code.
    pub fn count(
        &self,
        code: DiagnosticCode,
    ) -> usize {
        self.records.iter().filter(|d| d.code == code).count()
    }

    /// All emitted diagnostics in order.
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Number of emitted diagnostics.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget everything, re-arming the latch.
    pub fn clear(&mut self) {
        self.emitted.clear();
        self.records.clear();
    }
}
