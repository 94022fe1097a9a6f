//! Listener handles and the per-event ordered set that stores them.
//!
//! A [`Listener`] wraps a callable behind an `Arc`. Cloning the handle is cheap
//! and keeps its identity: two handles are the same listener exactly when they
//! share the same callable, no matter what the callable does.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use relay_core::{ListenerError, ListenerResult};

/// Pending outcome of one listener invocation.
pub type ListenerFuture<R> = Pin<Box<dyn Future<Output = anyhow::Result<R>> + Send + 'static>>;

type ListenerFn<C, A, R> = dyn Fn(Option<Arc<C>>, Arc<[A]>) -> ListenerFuture<R> + Send + Sync;

/// A registered callable, invoked with the emitter's context and the emitted
/// arguments.
///
/// Synchronous and asynchronous listeners share one shape: both yield a
/// [`ListenerFuture`], already settled in the synchronous case.
pub struct Listener<C, A, R> {
    inner: Arc<ListenerFn<C, A, R>>,
}

impl<C, A, R> Listener<C, A, R>
where
    C: Send + Sync + 'static,
    A: Send + Sync + 'static,
    R: Send + 'static,
{
    /// Wrap a callable that already returns a [`ListenerFuture`].
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<Arc<C>>, Arc<[A]>) -> ListenerFuture<R> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Wrap a synchronous callable.
    ///
    /// The callable runs when the listener is invoked; its result is handed
    /// back as a ready future.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Option<&C>, &[A]) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        Self::new(move |ctx, args| {
            let out = f(ctx.as_deref(), &args[..]);
            let ready: ListenerFuture<R> = Box::pin(std::future::ready(out));
            ready
        })
    }

    /// Wrap a callable returning a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Option<Arc<C>>, Arc<[A]>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    {
        Self::new(move |ctx, args| {
            let pending: ListenerFuture<R> = Box::pin(f(ctx, args));
            pending
        })
    }

    /// Invoke the listener and wait for it to settle.
    ///
    /// A panic raised while calling the callable or while polling its future
    /// is caught and turned into [`ListenerError::Panicked`].
    pub async fn invoke(&self, ctx: Option<Arc<C>>, args: Arc<[A]>) -> ListenerResult<R> {
        let pending = panic::catch_unwind(AssertUnwindSafe(|| (self.inner)(ctx, args)))
            .map_err(ListenerError::from_panic)?;
        AssertUnwindSafe(pending)
            .catch_unwind()
            .await
            .map_err(ListenerError::from_panic)?
            .map_err(ListenerError::Failed)
    }
}

impl<C, A, R> Listener<C, A, R> {
    /// Whether two handles refer to the same listener.
    pub fn same(&self, other: &Self) -> bool {
        core::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl<C, A, R> Clone for Listener<C, A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, A, R> PartialEq for Listener<C, A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<C, A, R> Eq for Listener<C, A, R> {}

impl<C, A, R> core::fmt::Debug for Listener<C, A, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Ordered, duplicate-free listeners of one event key.
///
/// Iteration follows first-insertion order.
pub struct ListenerSet<C, A, R> {
    listeners: Vec<Listener<C, A, R>>,
}

impl<C, A, R> Default for ListenerSet<C, A, R> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<C, A, R> ListenerSet<C, A, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` unless it is already present.
    ///
    /// Returns `false` for a duplicate.
    pub fn insert(&mut self, listener: Listener<C, A, R>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Remove `listener`, returning whether it was present.
    pub fn remove(&mut self, listener: &Listener<C, A, R>) -> bool {
        match self.listeners.iter().position(|l| l.same(listener)) {
            Some(idx) => {
                self.listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &Listener<C, A, R>) -> bool {
        self.listeners.iter().any(|l| l.same(listener))
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener<C, A, R>> {
        self.listeners.iter()
    }

    /// Copy of the current handles, in order.
    pub fn snapshot(&self) -> Vec<Listener<C, A, R>> {
        self.listeners.clone()
    }
}

impl<C, A, R> core::fmt::Debug for ListenerSet<C, A, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.listeners.iter()).finish()
    }
}
