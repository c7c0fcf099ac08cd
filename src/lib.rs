//! A concurrent, in-process event emitter.
//!
//! Handlers are registered under event names with [`Emitter::on`] and
//! [`Emitter::once`]. Emitting an event runs the handlers of `before:<event>`,
//! `<event>` and `after:<event>` in that order on a spawned tokio task, and
//! stops at the first handler error. [`Emitter::emit_once`] also remembers
//! the payload so that handlers registered later are replayed with it.

mod completion;
mod data;
mod drain;
mod emitter;
mod error;
pub mod event;
mod handler;
mod handler_set;
mod in_flight;
pub mod logger;

pub use {
    completion::Completion,
    data::{Data, Value},
    drain::Drain,
    emitter::Emitter,
    error::{HandlerError, Result},
    handler::*,
    handler_set::HandlerSet,
    logger::{Logger, LoggerExt, TracingLogger},
};
