mod from_fn;

use crate::{Data, Result};
use futures::future::BoxFuture;
use std::sync::Arc;

pub use from_fn::*;

/// Something that reacts to an emitted event.
///
/// Each invocation receives its own copy of the payload. Returning an error
/// stops the rest of the dispatch chain; return [`HandlerError::Halt`] to stop
/// it without the emission being logged as a failure.
///
/// Closures are adapted with [`from_fn`] (async) and [`from_sync_fn`].
///
/// [`HandlerError::Halt`]: crate::HandlerError::Halt
pub trait Handler: Send + Sync + 'static {
    fn call(&self, data: Data) -> BoxFuture<'_, Result>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    #[inline]
    fn call(&self, data: Data) -> BoxFuture<'_, Result> {
        (**self).call(data)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    #[inline]
    fn call(&self, data: Data) -> BoxFuture<'_, Result> {
        (**self).call(data)
    }
}
