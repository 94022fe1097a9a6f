//! Listener error model.

use std::any::Any;

use thiserror::Error;

/// Result type produced by a single listener invocation.
pub type ListenerResult<T> = Result<T, ListenerError>;

/// Failure of one listener during an emission.
///
/// These never escape `emit`; they are handed to a diagnostic sink and the
/// emission moves on to the next listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listener returned an error (synchronously or from its future).
    #[error("listener failed: {0:#}")]
    Failed(anyhow::Error),

    /// Invoking the listener panicked.
    #[error("listener panicked: {0}")]
    Panicked(String),
}

impl ListenerError {
    /// Build a `Panicked` error from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// The underlying error when the listener returned `Err`.
    pub fn failure(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Failed(e) => Some(e),
            Self::Panicked(_) => None,
        }
    }

    /// Downcast the underlying failure to a concrete error type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: core::fmt::Display + core::fmt::Debug + Send + Sync + 'static,
    {
        self.failure().and_then(|e| e.downcast_ref::<E>())
    }
}

impl From<anyhow::Error> for ListenerError {
    fn from(value: anyhow::Error) -> Self {
        Self::Failed(value)
    }
}
