//! The dynamic value type shared by every interposition operation.
//!
//! [`Value`] is a tagged union covering the handful of shapes the
//! resolution walk and the interception machinery care about: plain
//! data, property-bearing objects, and callable functions. Objects and
//! functions are reference handles, so cloning a [`Value`] never deep
//! copies a namespace tree.

use core::fmt;

use crate::func::FnValue;
use crate::namespace::Namespace;

/// A dynamically typed value.
///
/// Data-bearing variants ([`Bool`](Value::Bool), [`Int`](Value::Int),
/// [`Float`](Value::Float), [`Str`](Value::Str), [`List`](Value::List))
/// compare by content. [`Object`](Value::Object) and [`Fn`](Value::Fn)
/// are shared handles and compare by identity.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value. Missing namespace entries resolve to this.
    Undefined,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A double-precision float.
    Float(f64),
    /// An owned string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A property-bearing object, shared by handle.
    Object(Namespace),
    /// A callable function, shared by handle.
    Fn(FnValue),
}

/// The coarse type of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Undefined`].
    Undefined,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Int`].
    Int,
    /// [`Value::Float`].
    Float,
    /// [`Value::Str`].
    Str,
    /// [`Value::List`].
    List,
    /// [`Value::Object`].
    Object,
    /// [`Value::Fn`].
    Fn,
}

impl Value {
    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
            Value::Fn(_) => ValueKind::Fn,
        }
    }

    /// Whether this value is [`Value::Undefined`].
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Whether this value can be invoked.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Fn(_))
    }

    /// The function handle, if this value is callable.
    #[must_use]
    pub fn as_fn(&self) -> Option<&FnValue> {
        match self {
            Value::Fn(f) => Some(f),
            _ => None,
        }
    }

    /// The namespace handle, if this value is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Namespace> {
        match self {
            Value::Object(ns) => Some(ns),
            _ => None,
        }
    }

    /// The property map of this value, if it has one.
    ///
    /// Objects expose their namespace and functions expose their
    /// property bag, so a dotted lookup can step through either. Plain
    /// data has no properties.
    #[must_use]
    pub fn properties(&self) -> Option<Namespace> {
        match self {
            Value::Object(ns) => Some(ns.clone()),
            Value::Fn(f) => Some(f.props()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Fn(a), Value::Fn(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(_) => f.write_str("[object]"),
            Value::Fn(func) => write!(f, "[function {}]", func.name()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Object => "object",
            ValueKind::Fn => "function",
        };
        f.write_str(name)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Namespace> for Value {
    fn from(value: Namespace) -> Self {
        Value::Object(value)
    }
}

impl From<FnValue> for Value {
    fn from(value: FnValue) -> Self {
        Value::Fn(value)
    }
}
