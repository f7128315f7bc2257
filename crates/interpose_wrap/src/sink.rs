//! The destination for exceptions redirected away from augmentations.

use core::fmt;
use std::sync::Arc;

use interpose_value::func::FnError;

/// Receives exceptions raised by an interposed original when it is
/// invoked through the in-augmentation proxy.
///
/// Redirecting those exceptions here keeps a throwing original from
/// unwinding through augmentation code that never asked to handle it.
/// The default sink logs at error level; install a custom sink to
/// collect or forward redirected exceptions instead.
#[derive(Clone)]
pub struct ExceptionSink {
    handler: Arc<dyn Fn(&FnError) + Send + Sync>,
}

impl ExceptionSink {
    /// Create a sink that runs `handler` for every redirected exception.
    pub fn new(handler: impl Fn(&FnError) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Deliver `error` to the sink.
    pub fn report(&self, error: &FnError) {
        (self.handler)(error);
    }
}

impl Default for ExceptionSink {
    fn default() -> Self {
        Self::new(|error| {
            tracing::error!(%error, "uncaught exception from interposed original");
        })
    }
}

impl fmt::Debug for ExceptionSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionSink").finish_non_exhaustive()
    }
}
