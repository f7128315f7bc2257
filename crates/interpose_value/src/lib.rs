//! The dynamic value substrate for Interpose (Layer 1).
//!
//! `interpose_value` provides the data model everything else is built
//! on:
//!
//! - [`value`] - The tagged [`value::Value`] union and its kind
//! - [`namespace`] - Shared, mutable property maps
//! - [`func`] - Callable values, their metadata, and invocation errors
//! - [`path`] - Dotted path references
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Interpose architecture:
//!
//! - **Layer 1** (`interpose_value`): values, namespaces, functions (this crate)
//! - **Layer 2** (`interpose_wrap`): reference resolution and interception
//!
//! # Example
//!
//! ```
//! use interpose_value::func::FnValue;
//! use interpose_value::namespace::Namespace;
//! use interpose_value::value::Value;
//!
//! let root = Namespace::new();
//! let double = FnValue::new("double", 1, |_, args| match args {
//!     [Value::Int(n)] => Ok(Value::Int(n * 2)),
//!     _ => Ok(Value::Undefined),
//! });
//! root.insert("double", double);
//!
//! let Some(Value::Fn(f)) = root.get("double") else { unreachable!() };
//! assert_eq!(f.call(&Value::Undefined, &[Value::Int(21)]), Ok(Value::Int(42)));
//! ```

/// Callable values and invocation errors.
pub mod func;

/// Shared property maps.
pub mod namespace;

/// Dotted path references.
pub mod path;

/// The dynamic value union.
pub mod value;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::func::*;
    pub use crate::namespace::*;
    pub use crate::path::*;
    pub use crate::value::*;
}
