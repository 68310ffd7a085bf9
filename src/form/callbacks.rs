use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use super::controller::{FormAdapter, Rejection};

pub type FormFuture<T> = BoxFuture<'static, Result<T, Rejection>>;

pub(super) type LifecycleFn<A, V, T> =
    Arc<dyn Fn(A, FormAdapter<A, V>) -> FormFuture<T> + Send + Sync>;
pub(super) type NotifyFn<A, V, T> = Arc<dyn Fn(T, &FormAdapter<A, V>) + Send + Sync>;

/// What an `onvalidate` callback concluded.
///
/// `false` converts to [`Verdict::Invalid`] so simple callbacks can answer with a bool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict<V> {
    Valid(V),
    Invalid,
}

impl<V: Default> From<bool> for Verdict<V> {
    fn from(valid: bool) -> Self {
        if valid {
            Verdict::Valid(V::default())
        } else {
            Verdict::Invalid
        }
    }
}

/// User hooks for one adapter. The adapter is always passed last.
///
/// Unset hooks fall back to the adapter variant's default body, then to a no-op.
pub struct FormCallbacks<A = (), V = ()> {
    pub(super) oncancel: Option<LifecycleFn<A, V, V>>,
    pub(super) onsubmit: Option<LifecycleFn<A, V, V>>,
    pub(super) onvalidate: Option<LifecycleFn<A, V, Verdict<V>>>,
    pub(super) oninvalid: Option<NotifyFn<A, V, Option<Rejection>>>,
    pub(super) onsuccess: Option<NotifyFn<A, V, V>>,
    pub(super) onerror: Option<NotifyFn<A, V, Rejection>>,
}

impl<A, V> Clone for FormCallbacks<A, V> {
    fn clone(&self) -> Self {
        Self {
            oncancel: self.oncancel.clone(),
            onsubmit: self.onsubmit.clone(),
            onvalidate: self.onvalidate.clone(),
            oninvalid: self.oninvalid.clone(),
            onsuccess: self.onsuccess.clone(),
            onerror: self.onerror.clone(),
        }
    }
}

impl<A, V> Default for FormCallbacks<A, V> {
    fn default() -> Self {
        Self {
            oncancel: None,
            onsubmit: None,
            onvalidate: None,
            oninvalid: None,
            onsuccess: None,
            onerror: None,
        }
    }
}

impl<A, V> FormCallbacks<A, V>
where
    A: Clone + Send + Sync + 'static,
    V: Clone + Default + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn oncancel<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(A, FormAdapter<A, V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, Rejection>> + Send + 'static,
    {
        self.oncancel = Some(Arc::new(move |args, form| -> FormFuture<V> {
            Box::pin(handler(args, form))
        }));
        self
    }

    pub fn onsubmit<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(A, FormAdapter<A, V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, Rejection>> + Send + 'static,
    {
        self.onsubmit = Some(Arc::new(move |args, form| -> FormFuture<V> {
            Box::pin(handler(args, form))
        }));
        self
    }

    pub fn onvalidate<F, Fut, R>(mut self, handler: F) -> Self
    where
        F: Fn(A, FormAdapter<A, V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Rejection>> + Send + 'static,
        R: Into<Verdict<V>> + Send + 'static,
    {
        self.onvalidate = Some(Arc::new(move |args, form| -> FormFuture<Verdict<V>> {
            let validating = handler(args, form);
            Box::pin(async move { validating.await.map(Into::into) })
        }));
        self
    }

    pub fn oninvalid(
        mut self,
        handler: impl Fn(Option<Rejection>, &FormAdapter<A, V>) + Send + Sync + 'static,
    ) -> Self {
        self.oninvalid = Some(Arc::new(handler));
        self
    }

    pub fn onsuccess(
        mut self,
        handler: impl Fn(V, &FormAdapter<A, V>) + Send + Sync + 'static,
    ) -> Self {
        self.onsuccess = Some(Arc::new(handler));
        self
    }

    pub fn onerror(
        mut self,
        handler: impl Fn(Rejection, &FormAdapter<A, V>) + Send + Sync + 'static,
    ) -> Self {
        self.onerror = Some(Arc::new(handler));
        self
    }
}
