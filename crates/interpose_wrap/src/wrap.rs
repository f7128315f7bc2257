//! The replacement factory.
//!
//! [`wrap`] turns a target value and a piece of augmentation logic
//! into the function that will stand in for the target. Each
//! invocation of the replacement runs the same fixed sequence:
//!
//! 1. capture the receiver and arguments,
//! 2. create fresh invocation flags and a proxy for the original,
//! 3. run the augmentation with an [`Interception`] over all of it,
//! 4. if the original has not run and nobody claimed it, invoke it
//!    with the captured arguments,
//! 5. return the augmentation's value unless it is
//!    [`Value::Undefined`], in which case return the original's most
//!    recent result ([`Value::Undefined`] if it never ran).
//!
//! The replacement mirrors the original's declared parameter count and
//! shares its prototype object, so code that inspects either cannot
//! tell the swap happened. Whether the target is callable at all is
//! checked on invocation, never at wrap time.

use std::sync::Arc;

use interpose_value::func::{FnError, FnValue};
use interpose_value::namespace::Namespace;
use interpose_value::value::Value;

use crate::interception::{Interception, InvokeState, OriginalFn};
use crate::sink::ExceptionSink;

/// The signature of augmentation logic.
///
/// Runs once per invocation of the replacement, before any automatic
/// call of the original. Returning an error aborts the invocation and
/// surfaces the error to the replacement's caller.
pub type AugmentFn = dyn Fn(&Interception) -> Result<Value, FnError> + Send + Sync;

/// Build a replacement for `original` that runs `augmentation` around
/// it.
///
/// `original` may be any value; non-callables are accepted here and
/// rejected with [`FnError::NotCallable`] when the replacement is
/// invoked. Exceptions the original raises under the augmentation's
/// proxy go to `sink`; see [`OriginalFn::call`].
pub fn wrap(
    original: impl Into<Value>,
    augmentation: impl Fn(&Interception) -> Result<Value, FnError> + Send + Sync + 'static,
    sink: ExceptionSink,
) -> FnValue {
    let original = original.into();
    let label = match original.as_fn() {
        Some(func) => func.name().to_owned(),
        None => original.to_string(),
    };
    wrap_labeled(original, label, augmentation, sink)
}

/// [`wrap`] with an explicit label for diagnostics.
///
/// The label names the target in [`FnError::NotCallable`] messages and
/// in the replacement's own name. Path-based interposition passes the
/// path as written.
pub(crate) fn wrap_labeled(
    original: Value,
    label: String,
    augmentation: impl Fn(&Interception) -> Result<Value, FnError> + Send + Sync + 'static,
    sink: ExceptionSink,
) -> FnValue {
    let (param_count, prototype) = match original.as_fn() {
        Some(func) => (func.param_count(), func.prototype()),
        None => (0, Namespace::new()),
    };
    let name = format!("interposed({label})");
    let label: Arc<str> = label.into();
    let augmentation: Box<AugmentFn> = Box::new(augmentation);

    let body = move |receiver: &Value, args: &[Value]| -> Result<Value, FnError> {
        let state = Arc::new(InvokeState::new());
        let proxy = OriginalFn::new(
            Arc::clone(&label),
            original.clone(),
            receiver.clone(),
            Arc::clone(&state),
            sink.clone(),
        );
        let interception =
            Interception::new(args.to_vec(), receiver.clone(), proxy.clone(), Arc::clone(&state));

        let augment_ret = augmentation(&interception)?;

        // Fallback decision, read strictly after the augmentation's
        // synchronous return: flags flipped later (for example by a
        // stashed proxy on another thread) no longer count.
        let original_ret = if !state.called() && state.auto_invoke() {
            proxy.call_propagating(interception.args())?
        } else {
            state.original_ret()
        };

        Ok(if augment_ret.is_undefined() {
            original_ret
        } else {
            augment_ret
        })
    };

    FnValue::builder(name)
        .param_count(param_count)
        .prototype(prototype)
        .build(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(hits: &Arc<AtomicUsize>, ret: i64) -> FnValue {
        let hits = Arc::clone(hits);
        FnValue::new("counted", 1, move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Int(ret))
        })
    }

    #[test]
    fn silent_augmentation_falls_through_to_the_original() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |_| Ok(Value::Undefined),
            ExceptionSink::default(),
        );

        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(9)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn augmentation_value_overrides_the_original_value() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |_| Ok(Value::Int(42)),
            ExceptionSink::default(),
        );

        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(42)));
        assert_eq!(hits.load(Ordering::SeqCst), 1, "original still auto-invoked");
    }

    #[test]
    fn proxy_call_suppresses_the_automatic_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |cx| cx.call_original(),
            ExceptionSink::default(),
        );

        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(9)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn discarded_proxy_result_still_becomes_the_return_value() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |cx| {
                cx.call_original()?;
                Ok(Value::Undefined)
            },
            ExceptionSink::default(),
        );

        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(9)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn latest_proxy_result_wins_when_the_augmentation_stays_silent() {
        let echo = FnValue::new("echo", 1, |_, args| {
            Ok(args.first().cloned().unwrap_or(Value::Undefined))
        });
        let replacement = wrap(
            echo,
            |cx| {
                cx.call_original_with(&[Value::Int(1)])?;
                cx.call_original_with(&[Value::Int(2)])?;
                Ok(Value::Undefined)
            },
            ExceptionSink::default(),
        );

        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(2)));
    }

    #[test]
    fn claim_suppresses_the_automatic_call_without_running() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |cx| {
                cx.claim_original();
                Ok(Value::Int(1))
            },
            ExceptionSink::default(),
        );

        assert_eq!(replacement.call(&Value::Undefined, &[]), Ok(Value::Int(1)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn replacement_mirrors_param_count_and_prototype() {
        let original = FnValue::builder("orig")
            .param_count(3)
            .build(|_, _| Ok(Value::Undefined));
        let replacement = wrap(original.clone(), |_| Ok(Value::Undefined), ExceptionSink::default());

        assert_eq!(replacement.param_count(), 3);
        assert!(replacement.prototype().ptr_eq(&original.prototype()));
        assert_eq!(replacement.name(), "interposed(orig)");
    }

    #[test]
    fn non_callable_target_defaults_metadata_and_fails_on_invoke() {
        let replacement = wrap(Value::from(3), |_| Ok(Value::Undefined), ExceptionSink::default());

        assert_eq!(replacement.param_count(), 0);
        assert_eq!(replacement.name(), "interposed(3)");
        assert_eq!(
            replacement.call(&Value::Undefined, &[]),
            Err(FnError::not_callable("3", &Value::from(3))),
        );
    }

    #[test]
    fn augmentation_error_aborts_the_invocation() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |_| Err(FnError::raised("augment failed")),
            ExceptionSink::default(),
        );

        assert_eq!(
            replacement.call(&Value::Undefined, &[]),
            Err(FnError::raised("augment failed")),
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0, "aborted before the automatic call");
    }

    #[test]
    fn flags_reset_between_invocations() {
        let hits = Arc::new(AtomicUsize::new(0));
        let replacement = wrap(
            counter(&hits, 9),
            |cx| {
                if cx.args() == [Value::Int(0)] {
                    cx.claim_original();
                }
                Ok(Value::Undefined)
            },
            ExceptionSink::default(),
        );

        replacement.call(&Value::Undefined, &[Value::Int(0)]).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        replacement.call(&Value::Undefined, &[Value::Int(1)]).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1, "next invocation starts re-armed");
    }
}
