//! Event emitter: per-key listener registration and sequential async dispatch.
//!
//! ## Dispatch
//!
//! `emit` captures the listener set of its key when it is called, then runs
//! the captured listeners one at a time, in registration order. Each listener
//! is awaited before the next one starts. A listener that fails contributes
//! nothing to the results and is reported to the emitter's [`DiagnosticSink`];
//! the remaining listeners still run and `emit` itself never fails.
//!
//! ## Reentrancy
//!
//! Every method takes `&self`. The registry lock is only held while the
//! registry is read or mutated, never while a listener runs, so a listener
//! may call `on`/`off`/`purge` on the emitter that is invoking it. Such changes
//! apply to later emissions only.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relay_core::EventKey;
use tracing::{debug, trace};

use crate::listener::{Listener, ListenerSet};
use crate::registry::LazyRegistry;
use crate::sink::{DiagnosticSink, TracingSink};

type Registry<C, A, R> = LazyRegistry<EventKey, ListenerSet<C, A, R>>;

/// Emitter configuration.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Name for logging
    pub name: String,
    /// Log a `debug` record for every emission
    pub log_emissions: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            name: "emitter".to_string(),
            log_emissions: true,
        }
    }
}

impl EmitterConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_log_emissions(mut self, enabled: bool) -> Self {
        self.log_emissions = enabled;
        self
    }
}

/// Asynchronous, in-process event emitter.
///
/// - `C`: context handed to every listener (absent unless configured)
/// - `A`: argument type of an emission
/// - `R`: value produced by a successful listener
pub struct Emitter<C, A, R> {
    registry: Mutex<Registry<C, A, R>>,
    context: Option<Arc<C>>,
    sink: Arc<dyn DiagnosticSink>,
    config: EmitterConfig,
}

impl<C, A, R> Emitter<C, A, R>
where
    C: Send + Sync + 'static,
    A: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Create an emitter without a context.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create an emitter whose listeners all receive `context`.
    pub fn with_context(context: C) -> Self {
        Self::builder().context(context).build()
    }

    pub fn builder() -> EmitterBuilder<C, A, R> {
        EmitterBuilder::new()
    }

    /// Register `listener` for `key`.
    ///
    /// `None` is ignored. Registering a listener that is already present for
    /// `key` does nothing.
    pub fn on(
        &self,
        key: impl Into<EventKey>,
        listener: impl Into<Option<Listener<C, A, R>>>,
    ) -> &Self {
        let Some(listener) = listener.into() else {
            return self;
        };
        let key = key.into();
        let added = self.registry().get(key.clone()).insert(listener);
        trace!(emitter = %self.config.name, event = %key, added, "listener registered");
        self
    }

    /// Remove `listener` from `key`, or every listener of `key` when `None`.
    ///
    /// The key itself stays known to the registry.
    pub fn off(&self, key: impl Into<EventKey>, listener: Option<&Listener<C, A, R>>) -> &Self {
        let key = key.into();
        let mut registry = self.registry();
        let set = registry.get(key.clone());
        match listener {
            Some(listener) => {
                let removed = set.remove(listener);
                trace!(emitter = %self.config.name, event = %key, removed, "listener removed");
            }
            None => {
                let removed = set.len();
                set.clear();
                trace!(emitter = %self.config.name, event = %key, removed, "listeners cleared");
            }
        }
        self
    }

    /// Drop every listener of every key.
    pub fn purge(&self) -> &Self {
        let mut registry = self.registry();
        let keys = registry.len();
        registry.clear();
        debug!(emitter = %self.config.name, keys, "registry purged");
        self
    }

    /// Emit `args` to the listeners of `key`.
    ///
    /// The listener set is captured when this is called. The returned future
    /// resolves to the values of the listeners that succeeded, in registration
    /// order. An unknown key resolves to an empty list.
    pub fn emit(
        &self,
        key: impl Into<EventKey>,
        args: impl Into<Arc<[A]>>,
    ) -> impl Future<Output = Vec<R>> + Send + '_ {
        let key = key.into();
        let args = args.into();
        let listeners = self.registry().get(key.clone()).snapshot();
        self.dispatch(key, args, listeners)
    }

    async fn dispatch(
        &self,
        key: EventKey,
        args: Arc<[A]>,
        listeners: Vec<Listener<C, A, R>>,
    ) -> Vec<R> {
        if self.config.log_emissions {
            debug!(
                emitter = %self.config.name,
                event = %key,
                listeners = listeners.len(),
                args = args.len(),
                "emitting"
            );
        }

        let mut results = Vec::with_capacity(listeners.len());
        for listener in &listeners {
            match listener
                .invoke(self.context.clone(), Arc::clone(&args))
                .await
            {
                Ok(value) => results.push(value),
                Err(err) => self.sink.report(&key, &err),
            }
        }
        results
    }

    /// Number of listeners currently registered for `key`.
    pub fn listener_count(&self, key: impl Into<EventKey>) -> usize {
        let key: EventKey = key.into();
        self.registry().peek(&key).map_or(0, ListenerSet::len)
    }

    pub fn has_listeners(&self, key: impl Into<EventKey>) -> bool {
        self.listener_count(key) > 0
    }

    /// Keys touched since construction or the last `purge`, including keys
    /// whose listener set is now empty.
    pub fn event_keys(&self) -> Vec<EventKey> {
        self.registry().keys().cloned().collect()
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_deref()
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn registry(&self) -> MutexGuard<'_, Registry<C, A, R>> {
        // Listeners never run under this lock; a poisoned registry is still
        // structurally valid.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C, A, R> Default for Emitter<C, A, R>
where
    C: Send + Sync + 'static,
    A: Send + Sync + 'static,
    R: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A, R> core::fmt::Debug for Emitter<C, A, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("config", &self.config)
            .field("has_context", &self.context.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Emitter`].
pub struct EmitterBuilder<C, A, R> {
    context: Option<Arc<C>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    config: EmitterConfig,
    _marker: PhantomData<fn(A) -> R>,
}

impl<C, A, R> EmitterBuilder<C, A, R>
where
    C: Send + Sync + 'static,
    A: Send + Sync + 'static,
    R: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            context: None,
            sink: None,
            config: EmitterConfig::default(),
            _marker: PhantomData,
        }
    }

    pub fn context(self, context: C) -> Self {
        self.context_arc(Arc::new(context))
    }

    /// Share an existing context with the emitter.
    pub fn context_arc(mut self, context: Arc<C>) -> Self {
        self.context = Some(context);
        self
    }

    /// Route listener failures to `sink` instead of the `tracing` default.
    pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        let sink: Arc<dyn DiagnosticSink> = Arc::new(sink);
        self.sink = Some(sink);
        self
    }

    pub fn config(mut self, config: EmitterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn build(self) -> Emitter<C, A, R> {
        let sink: Arc<dyn DiagnosticSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(TracingSink::named(self.config.name.clone())),
        };
        Emitter {
            registry: Mutex::new(LazyRegistry::new()),
            context: self.context,
            sink,
            config: self.config,
        }
    }
}

impl<C, A, R> Default for EmitterBuilder<C, A, R>
where
    C: Send + Sync + 'static,
    A: Send + Sync + 'static,
    R: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
