//! # Interpose Internal Library
//!
//! Re-exports the core Interpose crates for convenience.

/// Layer 1: dynamic values, namespaces, and function metadata.
pub use interpose_value;

/// Layer 2: reference resolution and interception wrapping.
pub use interpose_wrap;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use interpose_value::prelude::*;
    pub use interpose_wrap::prelude::*;
}
