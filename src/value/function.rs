//! Function values
//!
//! A [`Function`] is a named native closure invoked with a slice of
//! arguments. State payloads are called with `[previous_state, props,
//! instance]`, commit callbacks with `[instance]`.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::Value;

/// Signature shared by every function value.
pub type NativeFn = dyn Fn(&[Value]) -> Value;

/// Named, reference-counted closure. Equality is identity.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    call: Rc<NativeFn>,
}

impl Function {
    /// Wrap a closure.
    pub fn new<F>(
        name: impl Into<Arc<str>>,
        f: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Self {
            name: name.into(),
            call: Rc::new(f),
        }
    }

    /// Debug name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with the given arguments.
    #[inline]
    pub fn call(
        &self,
        args: &[Value],
    ) -> Value {
        (self.call)(args)
    }

    /// Whether two handles point at the same closure.
    #[inline]
    pub fn ptr_eq(
        &self,
        other: &Function,
    ) -> bool {
        Rc::ptr_eq(&self.call, &other.call)
    }
}

impl PartialEq for Function {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}
