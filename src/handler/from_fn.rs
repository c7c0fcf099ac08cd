use crate::{Data, Handler, Result};
use futures::future::{self, BoxFuture, FutureExt};

pub struct FromFn<F>(F);

impl<F> FromFn<F> {
    #[inline]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F, Fut> Handler for FromFn<F>
where
    F: Fn(Data) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result> + Send + 'static,
{
    #[inline]
    fn call(&self, data: Data) -> BoxFuture<'_, Result> {
        (self.0)(data).boxed()
    }
}

/// Adapts an async closure into a [`Handler`].
#[inline]
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Data) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result> + Send + 'static,
{
    FromFn::new(f)
}

pub struct FromSyncFn<F>(F);

impl<F> FromSyncFn<F> {
    #[inline]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Handler for FromSyncFn<F>
where
    F: Fn(Data) -> Result + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, data: Data) -> BoxFuture<'_, Result> {
        future::ready((self.0)(data)).boxed()
    }
}

/// Adapts a plain closure into a [`Handler`]. The closure runs inline on the
/// dispatching task, so it should not block.
#[inline]
pub fn from_sync_fn<F>(f: F) -> FromSyncFn<F>
where
    F: Fn(Data) -> Result + Send + Sync + 'static,
{
    FromSyncFn::new(f)
}
