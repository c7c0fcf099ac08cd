use crate::{Data, Handler, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

struct Entry {
    handler: Arc<dyn Handler>,
    once: bool,
    claimed: AtomicBool,
}

impl Entry {
    /// A once-entry can be claimed a single time; persistent entries always
    /// succeed.
    fn claim(&self) -> bool {
        !self.once || !self.claimed.swap(true, Ordering::AcqRel)
    }
}

/// Removes a consumed once-entry when dropped, so the entry goes away even if
/// its handler returned an error or panicked.
struct Consume<'a> {
    set: &'a HandlerSet,
    entry: &'a Arc<Entry>,
}

impl Drop for Consume<'_> {
    fn drop(&mut self) {
        self.set
            .entries
            .lock()
            .retain(|entry| !Arc::ptr_eq(entry, self.entry));
    }
}

/// The ordered handlers registered under one event name.
///
/// Insertion order is dispatch order. [`call`](Self::call) iterates over a
/// snapshot, so handlers can be added or the set cleared while a dispatch is
/// running; those changes apply from the next call on.
#[derive(Default)]
pub struct HandlerSet {
    entries: Mutex<Vec<Arc<Entry>>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handler: Arc<dyn Handler>) {
        self.push(handler, false);
    }

    /// Adds a handler that is removed after its first invocation.
    pub fn add_once(&self, handler: Arc<dyn Handler>) {
        self.push(handler, true);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Invokes every handler in order, each with its own copy of `data`.
    ///
    /// Stops at the first error and returns it. Once-entries are consumed
    /// whether or not they succeed. This never logs.
    pub async fn call(&self, data: &Data) -> Result {
        let snapshot = self.entries.lock().clone();

        for entry in &snapshot {
            if !entry.claim() {
                continue;
            }

            let _consume = entry.once.then(|| Consume { set: self, entry });
            entry.handler.call(data.clone()).await?;
        }

        Ok(())
    }

    fn push(&self, handler: Arc<dyn Handler>, once: bool) {
        self.entries.lock().push(Arc::new(Entry {
            handler,
            once,
            claimed: AtomicBool::new(false),
        }));
    }
}
