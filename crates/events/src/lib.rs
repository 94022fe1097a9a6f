//! `relay-events` — in-process, asynchronous publish/subscribe.
//!
//! Listeners are registered per [`EventKey`] on an [`Emitter`]; `emit` runs
//! them one after another in registration order, collects the values of the
//! ones that succeed and reports the ones that fail to a [`DiagnosticSink`].

pub mod emitter;
pub mod listener;
pub mod registry;
pub mod sink;

pub use emitter::{Emitter, EmitterBuilder, EmitterConfig};
pub use listener::{Listener, ListenerFuture, ListenerSet};
pub use registry::LazyRegistry;
pub use sink::{DiagnosticSink, FnSink, TracingSink};

pub use relay_core::{EventKey, ListenerError, ListenerResult};
