//! Errors produced while resolving a reference to its target.

use interpose_value::value::ValueKind;
use thiserror::Error;

/// An error produced by walking a dotted path through a namespace.
///
/// Both variants carry the full path as written so the message names
/// the reference the caller actually supplied. Note the asymmetry with
/// invocation: a path whose final segment is merely missing resolves
/// fine and only fails later, when the replacement is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A segment read as undefined while segments remained to walk.
    #[error("`{path}` is undefined and cannot be extended as a function")]
    UnresolvedPath {
        /// The full path as written.
        path: String,
    },

    /// A segment landed on plain data, which has no properties to walk
    /// into. Distinct from [`ResolveError::UnresolvedPath`]: something
    /// was there, it just cannot be indexed.
    #[error("cannot walk `{path}`: `{resolved}` has no properties (it is of type {kind})")]
    NotIndexable {
        /// The full path as written.
        path: String,
        /// The prefix that resolved to the property-less value.
        resolved: String,
        /// Kind of the property-less value.
        kind: ValueKind,
    },
}

impl ResolveError {
    /// Build an [`ResolveError::UnresolvedPath`] for `path`.
    #[must_use]
    pub fn unresolved(path: impl Into<String>) -> Self {
        Self::UnresolvedPath { path: path.into() }
    }

    /// Build a [`ResolveError::NotIndexable`] for the value of `kind`
    /// found at `resolved` while walking `path`.
    #[must_use]
    pub fn not_indexable(
        path: impl Into<String>,
        resolved: impl Into<String>,
        kind: ValueKind,
    ) -> Self {
        Self::NotIndexable {
            path: path.into(),
            resolved: resolved.into(),
            kind,
        }
    }
}
