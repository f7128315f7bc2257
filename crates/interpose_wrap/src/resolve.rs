//! Turning a reference into a live target plus a write-back slot.
//!
//! A caller names the function to interpose either by handing over a
//! value or by a dotted path into a root namespace. [`resolve`] walks
//! the path one segment at a time and reports where the walk ended:
//! the value found there and, for paths, the exact container slot the
//! final segment names. The slot is what lets interposition re-point
//! the name in place so every existing consumer of the path picks up
//! the replacement.

use core::fmt;

use interpose_value::func::FnValue;
use interpose_value::namespace::Namespace;
use interpose_value::path::FnPath;
use interpose_value::value::Value;

use crate::error::ResolveError;

/// A reference to the callable being interposed.
#[derive(Debug, Clone)]
pub enum FnRef {
    /// A dotted path, resolved against the root namespace.
    Path(FnPath),
    /// A value supplied directly. Nothing checks that it is callable
    /// here; a non-callable surfaces when the replacement is invoked.
    Value(Value),
}

impl FnRef {
    /// A short label naming this reference in diagnostics.
    ///
    /// Paths label themselves as written; direct functions use their
    /// name; other direct values fall back to their display form.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            FnRef::Path(path) => path.raw().to_owned(),
            FnRef::Value(value) => match value.as_fn() {
                Some(func) => func.name().to_owned(),
                None => value.to_string(),
            },
        }
    }
}

impl fmt::Display for FnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FnRef::Path(path) => write!(f, "{path}"),
            FnRef::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for FnRef {
    fn from(raw: &str) -> Self {
        FnRef::Path(FnPath::new(raw))
    }
}

impl From<String> for FnRef {
    fn from(raw: String) -> Self {
        FnRef::Path(FnPath::new(raw))
    }
}

impl From<FnPath> for FnRef {
    fn from(path: FnPath) -> Self {
        FnRef::Path(path)
    }
}

impl From<Value> for FnRef {
    fn from(value: Value) -> Self {
        FnRef::Value(value)
    }
}

impl From<FnValue> for FnRef {
    fn from(func: FnValue) -> Self {
        FnRef::Value(Value::Fn(func))
    }
}

/// The namespace slot a path's final segment names.
///
/// Assigning through the slot is how a replacement lands where the
/// original lived.
#[derive(Debug, Clone)]
pub struct Slot {
    container: Namespace,
    key: String,
}

impl Slot {
    fn new(container: Namespace, key: String) -> Self {
        Self { container, key }
    }

    /// The namespace holding the slot.
    #[must_use]
    pub fn container(&self) -> &Namespace {
        &self.container
    }

    /// The key within the container.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value currently in the slot, or [`Value::Undefined`].
    #[must_use]
    pub fn read(&self) -> Value {
        self.container.get_or_undefined(&self.key)
    }

    /// Store `value` in the slot, returning what it replaced.
    pub fn assign(&self, value: impl Into<Value>) -> Option<Value> {
        self.container.insert(self.key.clone(), value)
    }
}

/// The outcome of resolving an [`FnRef`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The value the reference leads to. [`Value::Undefined`] when a
    /// path's final segment is not present yet.
    pub target: Value,
    /// The slot the reference names. `None` for direct values, which
    /// have no home to write a replacement back into.
    pub write_back: Option<Slot>,
}

/// Resolve `target` against `root`.
///
/// Direct values pass through untouched. Paths are walked segment by
/// segment, stepping through object namespaces and function property
/// bags alike. A missing *final* segment is not an error: the target
/// resolves to [`Value::Undefined`] and the slot still identifies
/// where a replacement would go.
///
/// # Errors
///
/// [`ResolveError::UnresolvedPath`] when a segment reads as undefined
/// with more segments left to walk, and [`ResolveError::NotIndexable`]
/// when a segment lands on plain data that has no properties.
pub fn resolve(root: &Namespace, target: &FnRef) -> Result<Resolution, ResolveError> {
    let path = match target {
        FnRef::Value(value) => {
            return Ok(Resolution {
                target: value.clone(),
                write_back: None,
            });
        }
        FnRef::Path(path) => path,
    };

    let mut current = Value::Object(root.clone());
    let mut slot = None;
    for (depth, segment) in path.segments().iter().enumerate() {
        let Some(bag) = current.properties() else {
            return Err(if current.is_undefined() {
                ResolveError::unresolved(path.raw())
            } else {
                ResolveError::not_indexable(path.raw(), path.prefix(depth), current.kind())
            });
        };
        current = bag.get_or_undefined(segment);
        slot = Some(Slot::new(bag, segment.clone()));
    }

    Ok(Resolution {
        target: current,
        write_back: slot,
    })
}
