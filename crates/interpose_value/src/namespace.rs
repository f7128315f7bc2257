//! Shared, mutable property maps.
//!
//! A [`Namespace`] is the container every dotted lookup walks through
//! and the slot container interposition writes replacements into. It
//! is a cheap handle over shared state: clones observe each other's
//! inserts, which is what lets a replacement installed through one
//! handle become visible through every other handle to the same map.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::value::Value;

/// A shared string-keyed map of [`Value`]s with stable insertion order.
#[derive(Clone, Default)]
pub struct Namespace {
    entries: Arc<RwLock<IndexMap<String, Value>>>,
}

impl Namespace {
    /// Create an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under `key`, returning the value it replaced.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.write().insert(key.into(), value.into())
    }

    /// Look up `key`, cloning the stored value out.
    ///
    /// Object and function values are handles, so the clone still
    /// refers to the same underlying state.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    /// Look up `key`, treating a missing entry as [`Value::Undefined`].
    #[must_use]
    pub fn get_or_undefined(&self, key: &str) -> Value {
        self.get(key).unwrap_or(Value::Undefined)
    }

    /// Remove `key`, returning the stored value if it was present.
    ///
    /// Preserves the ordering of the remaining entries.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.write().shift_remove(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// The keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the namespace has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The object stored under `key`, inserting a fresh one if the key
    /// is absent or holds a non-object.
    ///
    /// Handy for building nested trees: `ns.ensure_object("a")` returns
    /// a handle you can keep populating.
    pub fn ensure_object(&self, key: &str) -> Namespace {
        let mut entries = self.entries.write();
        if let Some(Value::Object(existing)) = entries.get(key) {
            return existing.clone();
        }
        let fresh = Namespace::new();
        entries.insert(key.to_owned(), Value::Object(fresh.clone()));
        fresh
    }

    /// Whether two handles refer to the same underlying map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_returns_replaced_value() {
        let ns = Namespace::new();
        assert!(ns.insert("x", 1).is_none());
        assert_eq!(ns.insert("x", 2), Some(Value::from(1)));
        assert_eq!(ns.get("x"), Some(Value::from(2)));
    }

    #[test]
    fn missing_keys_read_as_undefined() {
        let ns = Namespace::new();
        assert!(ns.get("absent").is_none());
        assert_eq!(ns.get_or_undefined("absent"), Value::Undefined);
    }

    #[test]
    fn clones_share_state() {
        let ns = Namespace::new();
        let alias = ns.clone();
        ns.insert("shared", "yes");
        assert_eq!(alias.get("shared"), Some(Value::from("yes")));
        assert!(ns.ptr_eq(&alias));
        assert!(!ns.ptr_eq(&Namespace::new()));
    }

    #[test]
    fn keys_keep_insertion_order() {
        let ns = Namespace::new();
        ns.insert("b", 1);
        ns.insert("a", 2);
        ns.insert("c", 3);
        assert_eq!(ns.keys(), vec!["b", "a", "c"]);
        ns.remove("a");
        assert_eq!(ns.keys(), vec!["b", "c"]);
    }

    #[test]
    fn ensure_object_reuses_existing_objects() {
        let ns = Namespace::new();
        let first = ns.ensure_object("nested");
        first.insert("inner", 1);
        let second = ns.ensure_object("nested");
        assert!(first.ptr_eq(&second));
        assert_eq!(second.get("inner"), Some(Value::from(1)));
    }

    #[test]
    fn ensure_object_replaces_plain_data() {
        let ns = Namespace::new();
        ns.insert("slot", 7);
        let obj = ns.ensure_object("slot");
        assert!(obj.is_empty());
        assert_eq!(ns.get("slot"), Some(Value::Object(obj)));
    }
}
