//! Callable values and the errors their invocation can produce.
//!
//! A [`FnValue`] bundles a native Rust body with the metadata callers
//! can observe from the outside: a name, a declared parameter count, a
//! prototype object, and a property bag. The metadata exists so a
//! replacement function can mirror the function it stands in for, and
//! the property bag lets dotted lookups step through function nodes the
//! same way they step through objects.

use std::sync::Arc;

use thiserror::Error;

use crate::namespace::Namespace;
use crate::value::{Value, ValueKind};

/// The signature of a native function body.
///
/// The first argument is the receiver the function was invoked on
/// ([`Value::Undefined`] for free functions), the second is the
/// argument list.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, FnError> + Send + Sync;

/// An error produced by invoking, or failing to invoke, a function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FnError {
    /// The invoked target turned out not to be a function.
    ///
    /// Carries the reference that was invoked, the textual form of the
    /// value found there, and its kind, so the message pinpoints what
    /// actually sat in the slot.
    #[error("`{target}` is not a function: its value is `{repr}` and it is of type {kind}")]
    NotCallable {
        /// The reference the caller tried to invoke.
        target: String,
        /// Display form of the non-callable value.
        repr: String,
        /// Kind of the non-callable value.
        kind: ValueKind,
    },
    /// An exception raised by a function body.
    #[error("uncaught exception: {0}")]
    Raised(Value),
}

impl FnError {
    /// Build a [`FnError::NotCallable`] describing `value` found at
    /// `target`.
    #[must_use]
    pub fn not_callable(target: impl Into<String>, value: &Value) -> Self {
        Self::NotCallable {
            target: target.into(),
            repr: value.to_string(),
            kind: value.kind(),
        }
    }

    /// Build a [`FnError::Raised`] carrying `payload`.
    #[must_use]
    pub fn raised(payload: impl Into<Value>) -> Self {
        Self::Raised(payload.into())
    }
}

struct FnInner {
    name: String,
    param_count: usize,
    prototype: Namespace,
    props: Namespace,
    body: Box<NativeFn>,
}

/// A callable value, shared by handle.
///
/// Cloning a `FnValue` clones the handle; both handles invoke the same
/// body and observe the same prototype and property bag.
#[derive(Clone)]
pub struct FnValue {
    inner: Arc<FnInner>,
}

impl FnValue {
    /// Create a function with a fresh prototype and property bag.
    pub fn new(
        name: impl Into<String>,
        param_count: usize,
        body: impl Fn(&Value, &[Value]) -> Result<Value, FnError> + Send + Sync + 'static,
    ) -> Self {
        Self::builder(name).param_count(param_count).build(body)
    }

    /// Start building a function named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> FnValueBuilder {
        FnValueBuilder {
            name: name.into(),
            param_count: 0,
            prototype: None,
            props: None,
        }
    }

    /// The function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The declared parameter count.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.inner.param_count
    }

    /// The prototype object, shared by handle.
    #[must_use]
    pub fn prototype(&self) -> Namespace {
        self.inner.prototype.clone()
    }

    /// The property bag, shared by handle.
    ///
    /// Dotted lookups step through this map when a path segment lands
    /// on a function.
    #[must_use]
    pub fn props(&self) -> Namespace {
        self.inner.props.clone()
    }

    /// Invoke the body with `receiver` and `args`.
    ///
    /// No namespace lock is held while the body runs, so bodies are
    /// free to read and mutate namespaces, including the one they were
    /// looked up in.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, FnError> {
        (self.inner.body)(receiver, args)
    }

    /// Whether two handles refer to the same function.
    #[must_use]
    pub fn ptr_eq(&self, other: &FnValue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for FnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnValue")
            .field("name", &self.inner.name)
            .field("param_count", &self.inner.param_count)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FnValue`], for when the defaults are not enough.
#[derive(Debug)]
pub struct FnValueBuilder {
    name: String,
    param_count: usize,
    prototype: Option<Namespace>,
    props: Option<Namespace>,
}

impl FnValueBuilder {
    /// Set the declared parameter count.
    #[must_use]
    pub fn param_count(mut self, count: usize) -> Self {
        self.param_count = count;
        self
    }

    /// Use `prototype` instead of a fresh object.
    ///
    /// This is how a replacement shares prototype identity with the
    /// function it replaces.
    #[must_use]
    pub fn prototype(mut self, prototype: Namespace) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Use `props` as the property bag instead of a fresh object.
    #[must_use]
    pub fn props(mut self, props: Namespace) -> Self {
        self.props = Some(props);
        self
    }

    /// Finish the build with `body` as the native implementation.
    pub fn build(
        self,
        body: impl Fn(&Value, &[Value]) -> Result<Value, FnError> + Send + Sync + 'static,
    ) -> FnValue {
        FnValue {
            inner: Arc::new(FnInner {
                name: self.name,
                param_count: self.param_count,
                prototype: self.prototype.unwrap_or_default(),
                props: self.props.unwrap_or_default(),
                body: Box::new(body),
            }),
        }
    }
}
