//! Diagnostic sinks receiving listener failures.
//!
//! The emitter calls [`DiagnosticSink::report`] once per failed listener, at
//! the point the failure is caught, and then carries on with the next one.

use std::sync::Arc;

use relay_core::{EventKey, ListenerError};
use tracing::error;

/// Receiver of listener failures.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, key: &EventKey, error: &ListenerError);
}

impl<S> DiagnosticSink for Arc<S>
where
    S: DiagnosticSink + ?Sized,
{
    fn report(&self, key: &EventKey, error: &ListenerError) {
        (**self).report(key, error)
    }
}

/// Default sink: one `error` record per failure on the `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingSink {
    emitter: String,
}

impl TracingSink {
    /// Create a sink tagging its records with `emitter`.
    pub fn named(emitter: impl Into<String>) -> Self {
        Self {
            emitter: emitter.into(),
        }
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, key: &EventKey, err: &ListenerError) {
        error!(
            emitter = %self.emitter,
            event = %key,
            panicked = err.is_panic(),
            error = %err,
            "listener failed"
        );
    }
}

/// Adapter turning a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> DiagnosticSink for FnSink<F>
where
    F: Fn(&EventKey, &ListenerError) + Send + Sync,
{
    fn report(&self, key: &EventKey, error: &ListenerError) {
        (self.0)(key, error)
    }
}

impl<F> core::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("FnSink").finish_non_exhaustive()
    }
}
