use crate::event::{self, is_meta};
use crate::in_flight::InFlight;
use crate::logger::{Fields, Logger, LoggerExt, TracingLogger};
use crate::{Completion, Data, Drain, Handler, HandlerError, HandlerSet, Result, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;

const META_EMIT_WARNING: &str = "Cannot emit meta events 'before' or 'after' directly.";
const HALTED: &str = "Event emission halted.";
const FAILED: &str = "Failed during execution of event handlers.";
const NO_RUNTIME: &str = "No tokio runtime to dispatch on; event dropped.";

struct Inner {
    handlers: papaya::HashMap<String, Arc<HandlerSet>>,
    /// Payloads of `emit_once` calls, keyed by main and meta names. The three
    /// names of one call share a single snapshot.
    one_time: RwLock<HashMap<String, Arc<Data>>>,
    log: Option<Arc<dyn Logger>>,
    in_flight: InFlight,
}

impl Inner {
    fn handler_set(&self, event: &str) -> Arc<HandlerSet> {
        let handlers = self.handlers.pin();
        if let Some(set) = handlers.get(event) {
            return set.clone();
        }
        handlers
            .get_or_insert_with(event.to_owned(), Default::default)
            .clone()
    }

    fn existing_handler_set(&self, event: &str) -> Option<Arc<HandlerSet>> {
        self.handlers.pin().get(event).cloned()
    }
}

/// Dispatches named events to registered handlers.
///
/// Every emission of `event` runs three phases in order: the handlers of
/// `before:event`, then `event`, then `after:event`. The first error from any
/// handler ends the emission. Emissions run on their own tokio task; the
/// caller gets a [`Completion`] to await.
///
/// Cloning is cheap and every clone shares the same registry.
#[derive(Clone)]
pub struct Emitter {
    inner: Arc<Inner>,
}

impl Emitter {
    /// Creates an emitter with no handlers. `log` receives warnings and
    /// dispatch failures; pass `None` to discard them.
    pub fn new(log: Option<Arc<dyn Logger>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                handlers: papaya::HashMap::new(),
                one_time: RwLock::default(),
                log,
                in_flight: InFlight::default(),
            }),
        }
    }

    pub fn silent() -> Self {
        Self::new(None)
    }

    /// Logs through a [`TracingLogger`] tagged with `source`.
    pub fn with_tracing(source: impl Into<String>) -> Self {
        let log: Arc<dyn Logger> = Arc::new(TracingLogger::new(source));
        Self::new(Some(log))
    }

    /// Registers `handler` for every future emission of `event`.
    ///
    /// If `event` was already fired with [`emit_once`](Self::emit_once), the
    /// handler is also invoked right away with a copy of that payload, before
    /// this returns.
    pub async fn on(&self, event: &str, handler: impl Handler) {
        let handler: Arc<dyn Handler> = Arc::new(handler);

        let cached = {
            let one_time = self.inner.one_time.read();
            self.inner.handler_set(event).add(handler.clone());
            one_time.get(event).cloned()
        };

        if let Some(data) = cached {
            let result = handler.call(Data::clone(&data)).await;
            self.report(event, &data, result, true);
        }
    }

    /// Registers `handler` for the next emission of `event` only.
    ///
    /// If `event` was already fired with [`emit_once`](Self::emit_once), the
    /// handler is invoked right away with a copy of that payload instead, and
    /// is not registered.
    pub async fn once(&self, event: &str, handler: impl Handler) {
        let data = {
            let one_time = self.inner.one_time.read();
            match one_time.get(event) {
                Some(data) => data.clone(),
                None => {
                    self.inner.handler_set(event).add_once(Arc::new(handler));
                    return;
                }
            }
        };

        let result = handler.call(Data::clone(&data)).await;
        self.report(event, &data, result, true);
    }

    /// Removes every handler of `event` and of its `before:`/`after:` names.
    pub fn off(&self, event: &str) {
        for name in event::phases(event) {
            if let Some(set) = self.inner.existing_handler_set(&name) {
                set.clear();
            }
        }
    }

    /// Emits `event` with `data` (an empty payload for `None`).
    ///
    /// Returns immediately; dispatch runs on a task spawned onto the current
    /// tokio runtime. Handler errors are logged, never returned. Outside a
    /// runtime nothing is dispatched: the error is logged and the returned
    /// completion is already settled.
    pub fn emit(&self, event: &str, data: impl Into<Option<Data>>) -> Completion {
        let data = data.into().unwrap_or_default();

        if is_meta(event) {
            if let Some(log) = &self.inner.log {
                log.with_fields(fields(event, &data))
                    .warn(META_EMIT_WARNING);
            }
        }

        self.dispatch(event.to_owned(), data)
    }

    /// Emits `event` and remembers `data` for handlers registered later.
    ///
    /// Subsequent [`on`](Self::on) and [`once`](Self::once) calls for `event`,
    /// `before:event` or `after:event` are replayed with a copy of `data`.
    /// Calling this again replaces the remembered payload.
    pub fn emit_once(&self, event: &str, data: impl Into<Option<Data>>) -> Completion {
        let data = data.into().unwrap_or_default();

        {
            let snapshot = Arc::new(data.clone());
            let mut one_time = self.inner.one_time.write();
            for name in event::phases(event) {
                one_time.insert(name, snapshot.clone());
            }
        }

        self.emit(event, data)
    }

    /// Number of handlers registered under exactly `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.inner
            .existing_handler_set(event)
            .map_or(0, |set| set.len())
    }

    pub fn has_handlers(&self, event: &str) -> bool {
        self.handler_count(event) > 0
    }

    /// Whether an [`emit_once`](Self::emit_once) payload is remembered for
    /// `event`.
    pub fn is_cached(&self, event: &str) -> bool {
        self.inner.one_time.read().contains_key(event)
    }

    fn dispatch(&self, event: String, data: Data) -> Completion {
        let (dispatch, completion) = self.inner.in_flight.start();

        let Ok(runtime) = Handle::try_current() else {
            if let Some(log) = &self.inner.log {
                log.with_fields(fields(&event, &data)).error(NO_RUNTIME);
            }
            drop(dispatch);
            return completion;
        };

        let emitter = self.clone();
        runtime.spawn(async move {
            let _dispatch = dispatch;
            let result = emitter.run_phases(&event, &data).await;
            emitter.report(&event, &data, result, false);
        });

        completion
    }

    async fn run_phases(&self, event: &str, data: &Data) -> Result {
        for name in event::phases(event) {
            if let Some(set) = self.inner.existing_handler_set(&name) {
                set.call(data).await?;
            }
        }
        Ok(())
    }

    fn report(&self, event: &str, data: &Data, result: Result, replay: bool) {
        let (Err(err), Some(log)) = (result, &self.inner.log) else {
            return;
        };

        let mut fields = fields(event, data);
        if replay {
            fields.insert("replay", true);
        }

        match err {
            HandlerError::Halt => log.with_fields(fields).debug(HALTED),
            err => {
                fields.insert("error", err.to_string());
                log.with_fields(fields).error(FAILED);
            }
        }
    }
}

fn fields(event: &str, data: &Data) -> Fields {
    Fields::from_iter([
        ("event", Value::from(event)),
        ("data", Value::Map(data.clone())),
    ])
}

impl Default for Emitter {
    fn default() -> Self {
        Self::silent()
    }
}

impl Drain for Emitter {
    async fn drain(&self) {
        self.inner.in_flight.idle().await;
    }
}
