//! Reference resolution and interception wrapping for Interpose
//! (Layer 2).
//!
//! `interpose_wrap` takes a reference to a function — a value in hand
//! or a dotted path into a namespace — and swaps in a replacement that
//! runs augmentation logic around the original. The replacement keeps
//! the original reachable through a proxy, auto-invokes it when the
//! augmentation stays silent, and mirrors its observable metadata.
//!
//! # Core Concepts
//!
//! - [`Realm`] - Root namespace plus exception sink; the entry point
//! - [`FnRef`] - Reference to the target, by value or by dotted path
//! - [`resolve`] - The path walk producing a target and write-back slot
//! - [`Interception`] - What one invocation exposes to its augmentation
//! - [`OriginalFn`] - Proxy for the original, detachable from the call
//! - [`ExceptionSink`] - Destination for proxy-redirected exceptions
//!
//! # Example
//!
//! ```
//! use interpose_value::func::FnValue;
//! use interpose_value::value::Value;
//! use interpose_wrap::realm::Realm;
//!
//! let realm = Realm::new();
//! realm.root().ensure_object("app").insert(
//!     "greet",
//!     FnValue::new("greet", 1, |_, args| match args {
//!         [Value::Str(name)] => Ok(Value::Str(format!("hello, {name}"))),
//!         _ => Ok(Value::Undefined),
//!     }),
//! );
//!
//! realm.interpose("app.greet", |cx| match cx.args() {
//!     [Value::Str(name)] if name == "root" => Ok(Value::from("who goes there?")),
//!     _ => Ok(Value::Undefined), // stay silent, the original answers
//! })?;
//!
//! let Some(Value::Fn(greet)) = realm.root().ensure_object("app").get("greet") else {
//!     unreachable!()
//! };
//! assert_eq!(
//!     greet.call(&Value::Undefined, &[Value::from("root")]),
//!     Ok(Value::from("who goes there?")),
//! );
//! assert_eq!(
//!     greet.call(&Value::Undefined, &[Value::from("ada")]),
//!     Ok(Value::from("hello, ada")),
//! );
//! # Ok::<(), interpose_wrap::error::ResolveError>(())
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2 of the Interpose architecture:
//!
//! - **Layer 1** (`interpose_value`): values, namespaces, functions
//! - **Layer 2** (`interpose_wrap`): resolution and interception (this crate)

/// Resolution errors.
pub mod error;

/// Per-invocation state and the proxy for the original.
pub mod interception;

/// The interposition host.
pub mod realm;

/// Reference resolution and write-back slots.
pub mod resolve;

/// The exception sink.
pub mod sink;

/// The replacement factory.
pub mod wrap;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::error::ResolveError;
    pub use crate::interception::{Interception, OriginalFn};
    pub use crate::realm::Realm;
    pub use crate::resolve::{FnRef, Resolution, Slot, resolve};
    pub use crate::sink::ExceptionSink;
    pub use crate::wrap::{AugmentFn, wrap};
}

// Re-export key types at crate root for convenience
pub use error::ResolveError;
pub use interception::{Interception, OriginalFn};
pub use realm::Realm;
pub use resolve::{FnRef, Resolution, Slot, resolve};
pub use sink::ExceptionSink;
pub use wrap::{AugmentFn, wrap};
