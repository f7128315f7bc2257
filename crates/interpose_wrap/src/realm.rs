//! The host for interposition: a root namespace plus a sink.

use interpose_value::func::{FnError, FnValue};
use interpose_value::namespace::Namespace;
use interpose_value::value::Value;

use crate::error::ResolveError;
use crate::interception::Interception;
use crate::resolve::{FnRef, Resolution, resolve};
use crate::sink::ExceptionSink;
use crate::wrap::wrap_labeled;

/// A root namespace and the exception sink its interpositions report
/// to.
///
/// The root is what dotted paths resolve against; the sink is where
/// proxy-redirected exceptions go for every replacement created
/// through this realm. Both are shared handles, so clones of a realm
/// host the same world.
#[derive(Clone, Debug, Default)]
pub struct Realm {
    root: Namespace,
    sink: ExceptionSink,
}

impl Realm {
    /// Create a realm with an empty root and the default logging sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `root` as the namespace paths resolve against.
    #[must_use]
    pub fn with_root(mut self, root: Namespace) -> Self {
        self.root = root;
        self
    }

    /// Use `sink` for proxy-redirected exceptions.
    #[must_use]
    pub fn with_sink(mut self, sink: ExceptionSink) -> Self {
        self.sink = sink;
        self
    }

    /// The root namespace.
    #[must_use]
    pub fn root(&self) -> &Namespace {
        &self.root
    }

    /// The exception sink.
    #[must_use]
    pub fn sink(&self) -> &ExceptionSink {
        &self.sink
    }

    /// Interpose `augmentation` around the callable `target` refers
    /// to.
    ///
    /// Path targets are re-pointed in place: the replacement is
    /// written into the slot the path names and `Ok(None)` comes back,
    /// since every consumer of the path now reaches the replacement
    /// anyway. Direct value targets have no slot, so the replacement
    /// comes back as `Ok(Some(..))` and the caller decides where it
    /// lives.
    ///
    /// # Errors
    ///
    /// [`ResolveError`] when a path cannot be walked to its final
    /// segment. A path whose final segment is merely missing is fine;
    /// the mistake surfaces as [`FnError::NotCallable`] when the
    /// replacement is invoked.
    ///
    /// [`FnError::NotCallable`]: interpose_value::func::FnError::NotCallable
    pub fn interpose(
        &self,
        target: impl Into<FnRef>,
        augmentation: impl Fn(&Interception) -> Result<Value, FnError> + Send + Sync + 'static,
    ) -> Result<Option<FnValue>, ResolveError> {
        let target = target.into();
        let Resolution {
            target: original,
            write_back,
        } = resolve(&self.root, &target)?;
        let replacement = wrap_labeled(original, target.label(), augmentation, self.sink.clone());

        match write_back {
            Some(slot) => {
                tracing::debug!(
                    path = %target,
                    replacement = replacement.name(),
                    "installed replacement in namespace slot"
                );
                slot.assign(replacement);
                Ok(None)
            }
            None => {
                tracing::debug!(original = %target, "built replacement for direct reference");
                Ok(Some(replacement))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_targets_hand_the_replacement_back() {
        let realm = Realm::new();
        let original = FnValue::new("direct", 2, |_, _| Ok(Value::Int(5)));

        let replacement = realm
            .interpose(original.clone(), |_| Ok(Value::Undefined))
            .unwrap()
            .expect("direct targets return the replacement");

        assert_eq!(replacement.param_count(), 2);
        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(5)));
        assert!(realm.root().is_empty(), "nothing written back");
    }

    #[test]
    fn path_targets_are_rewritten_in_place() {
        let realm = Realm::new();
        realm
            .root()
            .ensure_object("app")
            .insert("greet", FnValue::new("greet", 0, |_, _| Ok(Value::from("hi"))));

        let returned = realm
            .interpose("app.greet", |_| Ok(Value::Undefined))
            .unwrap();
        assert!(returned.is_none(), "path targets write back instead");

        let slot = realm.root().ensure_object("app").get_or_undefined("greet");
        let replacement = slot.as_fn().cloned().expect("slot now holds the replacement");
        assert_eq!(replacement.name(), "interposed(app.greet)");
        assert_eq!(
            replacement.call(&Value::Undefined, &[]),
            Ok(Value::from("hi")),
        );
    }

    #[test]
    fn resolution_failures_surface_as_errors() {
        let realm = Realm::new();
        let err = realm
            .interpose("ghost.greet", |_| Ok(Value::Undefined))
            .unwrap_err();
        assert_eq!(err, ResolveError::unresolved("ghost.greet"));
    }

    #[test]
    fn clones_share_the_root() {
        let realm = Realm::new();
        let alias = realm.clone();
        realm.root().insert("shared", 1);
        assert_eq!(alias.root().get("shared"), Some(Value::from(1)));
    }

    #[test]
    fn with_root_adopts_an_existing_namespace() {
        let world = Namespace::new();
        world.insert("ready", true);
        let realm = Realm::new().with_root(world.clone());
        assert!(realm.root().ptr_eq(&world));
    }
}
