//! Per-invocation state and the proxy the augmentation sees.
//!
//! Every call of a replacement function gets a fresh [`Interception`]:
//! the captured arguments and receiver, a proxy for the original, and
//! the two flags that drive the fallback decision after the
//! augmentation returns. Nothing carries over between invocations, so
//! concurrent and re-entrant calls of the same replacement cannot
//! observe each other's flags.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use interpose_value::func::{FnError, FnValue};
use interpose_value::value::Value;
use parking_lot::Mutex;

use crate::sink::ExceptionSink;

/// Flags and bookkeeping for one invocation of a replacement function.
#[derive(Debug)]
pub(crate) struct InvokeState {
    called: AtomicBool,
    auto_invoke: AtomicBool,
    original_ret: Mutex<Value>,
}

impl InvokeState {
    pub(crate) fn new() -> Self {
        Self {
            called: AtomicBool::new(false),
            auto_invoke: AtomicBool::new(true),
            original_ret: Mutex::new(Value::Undefined),
        }
    }

    pub(crate) fn mark_called(&self) {
        self.called.store(true, Ordering::SeqCst);
    }

    pub(crate) fn called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }

    pub(crate) fn claim(&self) {
        self.auto_invoke.store(false, Ordering::SeqCst);
    }

    pub(crate) fn auto_invoke(&self) -> bool {
        self.auto_invoke.load(Ordering::SeqCst)
    }

    pub(crate) fn record_original_ret(&self, value: Value) {
        *self.original_ret.lock() = value;
    }

    /// The most recent value the original produced in this
    /// invocation, [`Value::Undefined`] if it never ran.
    pub(crate) fn original_ret(&self) -> Value {
        self.original_ret.lock().clone()
    }
}

/// A proxy for the original callable, handed to augmentation code.
///
/// The proxy is clonable and `'static`: an augmentation may stash a
/// clone and invoke the original later, after the replacement call has
/// already returned. Invoking through the proxy records that the
/// original ran, which cancels the automatic call for the invocation
/// the proxy belongs to.
#[derive(Clone, Debug)]
pub struct OriginalFn {
    label: Arc<str>,
    original: Value,
    receiver: Value,
    state: Arc<InvokeState>,
    sink: ExceptionSink,
}

impl OriginalFn {
    pub(crate) fn new(
        label: Arc<str>,
        original: Value,
        receiver: Value,
        state: Arc<InvokeState>,
        sink: ExceptionSink,
    ) -> Self {
        Self {
            label,
            original,
            receiver,
            state,
            sink,
        }
    }

    /// Invoke the original with `args`, using the receiver captured at
    /// interception time.
    ///
    /// An exception raised by the original is reported to the
    /// exception sink and surfaces here as `Ok(Value::Undefined)`, so
    /// the augmentation keeps running even when the original throws.
    /// The result is also recorded in the invocation state: if the
    /// augmentation then returns [`Value::Undefined`], the replacement
    /// falls back to the original's most recent result.
    ///
    /// # Errors
    ///
    /// [`FnError::NotCallable`] when the interposed slot turned out to
    /// hold a non-callable. That one is not redirected: it means the
    /// interposition itself targeted the wrong thing, and the
    /// augmentation should hear about it.
    pub fn call(&self, args: &[Value]) -> Result<Value, FnError> {
        self.state.mark_called();
        let func = self.callable()?;
        let ret = match func.call(&self.receiver, args) {
            Ok(value) => value,
            Err(error) => {
                self.sink.report(&error);
                Value::Undefined
            }
        };
        self.state.record_original_ret(ret.clone());
        Ok(ret)
    }

    /// Invoke the original, letting a raised exception propagate.
    ///
    /// This is the automatic post-augmentation call: with no
    /// augmentation frame left on the stack there is nothing to
    /// shield, so the caller of the replacement sees the exception.
    pub(crate) fn call_propagating(&self, args: &[Value]) -> Result<Value, FnError> {
        self.state.mark_called();
        self.callable()?.call(&self.receiver, args)
    }

    /// Whether the interposed slot actually holds a callable.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        self.original.is_callable()
    }

    fn callable(&self) -> Result<&FnValue, FnError> {
        self.original
            .as_fn()
            .ok_or_else(|| FnError::not_callable(&*self.label, &self.original))
    }
}

/// Everything one invocation of a replacement exposes to its
/// augmentation.
#[derive(Debug)]
pub struct Interception {
    args: Vec<Value>,
    receiver: Value,
    original: OriginalFn,
    state: Arc<InvokeState>,
}

impl Interception {
    pub(crate) fn new(
        args: Vec<Value>,
        receiver: Value,
        original: OriginalFn,
        state: Arc<InvokeState>,
    ) -> Self {
        Self {
            args,
            receiver,
            original,
            state,
        }
    }

    /// The arguments the replacement was invoked with.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The receiver the replacement was invoked on.
    #[must_use]
    pub fn receiver(&self) -> &Value {
        &self.receiver
    }

    /// A proxy for the original, detachable from this invocation.
    #[must_use]
    pub fn original(&self) -> OriginalFn {
        self.original.clone()
    }

    /// Invoke the original with the captured arguments.
    ///
    /// Shorthand for `self.original().call(self.args())`; see
    /// [`OriginalFn::call`] for the exception contract.
    ///
    /// # Errors
    ///
    /// [`FnError::NotCallable`] when the interposed slot holds a
    /// non-callable.
    pub fn call_original(&self) -> Result<Value, FnError> {
        self.original.call(&self.args)
    }

    /// Invoke the original with `args` instead of the captured ones.
    ///
    /// # Errors
    ///
    /// [`FnError::NotCallable`] when the interposed slot holds a
    /// non-callable.
    pub fn call_original_with(&self, args: &[Value]) -> Result<Value, FnError> {
        self.original.call(args)
    }

    /// Declare that this invocation takes responsibility for the
    /// original, cancelling the automatic call.
    ///
    /// One-shot and per-invocation: the next invocation of the
    /// replacement starts with the automatic call armed again.
    pub fn claim_original(&self) {
        self.state.claim();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_fn(hits: &Arc<AtomicUsize>) -> Value {
        let hits = Arc::clone(hits);
        Value::Fn(FnValue::new("counted", 0, move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Int(7))
        }))
    }

    fn proxy_over(original: Value, sink: ExceptionSink) -> (OriginalFn, Arc<InvokeState>) {
        let state = Arc::new(InvokeState::new());
        let proxy = OriginalFn::new(
            Arc::from("target"),
            original,
            Value::Undefined,
            Arc::clone(&state),
            sink,
        );
        (proxy, state)
    }

    #[test]
    fn state_starts_unarmed_called_and_armed_auto() {
        let state = InvokeState::new();
        assert!(!state.called());
        assert!(state.auto_invoke());
        state.mark_called();
        state.claim();
        assert!(state.called());
        assert!(!state.auto_invoke());
    }

    #[test]
    fn proxy_call_marks_called_and_returns_the_value() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (proxy, state) = proxy_over(counting_fn(&hits), ExceptionSink::default());

        assert_eq!(proxy.call(&[]), Ok(Value::Int(7)));
        assert!(state.called());
        assert_eq!(state.original_ret(), Value::Int(7), "result recorded");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn proxy_redirects_raised_errors_to_the_sink() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = {
            let seen = Arc::clone(&seen);
            ExceptionSink::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };
        let throwing = Value::Fn(FnValue::new("throws", 0, |_, _| {
            Err(FnError::raised("boom"))
        }));
        let (proxy, state) = proxy_over(throwing, sink);

        assert_eq!(proxy.call(&[]), Ok(Value::Undefined));
        assert!(state.called());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn proxy_propagates_not_callable_instead_of_redirecting() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = {
            let seen = Arc::clone(&seen);
            ExceptionSink::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
        };
        let (proxy, _) = proxy_over(Value::from(3), sink);

        let err = proxy.call(&[]).unwrap_err();
        assert_eq!(err, FnError::not_callable("target", &Value::from(3)));
        assert_eq!(seen.load(Ordering::SeqCst), 0, "capability errors are not sunk");
    }

    #[test]
    fn automatic_variant_lets_exceptions_propagate() {
        let throwing = Value::Fn(FnValue::new("throws", 0, |_, _| {
            Err(FnError::raised("boom"))
        }));
        let (proxy, _) = proxy_over(throwing, ExceptionSink::default());
        assert_eq!(proxy.call_propagating(&[]), Err(FnError::raised("boom")));
    }

    #[test]
    fn claim_flows_from_interception_to_shared_state() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (proxy, state) = proxy_over(counting_fn(&hits), ExceptionSink::default());
        let interception = Interception::new(
            vec![Value::Int(1)],
            Value::Undefined,
            proxy,
            Arc::clone(&state),
        );

        interception.claim_original();
        assert!(!state.auto_invoke());
        assert!(!state.called());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn call_original_uses_the_captured_args() {
        let seen_args = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = {
            let seen_args = Arc::clone(&seen_args);
            Value::Fn(FnValue::new("recorder", 2, move |_, args| {
                seen_args.lock().unwrap().push(args.to_vec());
                Ok(Value::Undefined)
            }))
        };
        let (proxy, state) = proxy_over(recorder, ExceptionSink::default());
        let interception = Interception::new(
            vec![Value::Int(1), Value::from("two")],
            Value::Undefined,
            proxy,
            state,
        );

        interception.call_original().unwrap();
        interception
            .call_original_with(&[Value::Bool(true)])
            .unwrap();

        let seen = seen_args.lock().unwrap();
        assert_eq!(seen[0], vec![Value::Int(1), Value::from("two")]);
        assert_eq!(seen[1], vec![Value::Bool(true)]);
    }
}
