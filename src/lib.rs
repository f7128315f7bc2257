//! Function interposition for dynamic namespaces.
//!

pub use interpose_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use interpose_internal::prelude::*;
}
