use crate::Completion;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};

/// Tracks the dispatch tasks of one emitter.
///
/// The running count lives in a `watch` channel so [`idle`](Self::idle) can
/// wait for it to reach zero without polling.
#[derive(Debug, Clone)]
pub(crate) struct InFlight {
    running: Arc<watch::Sender<usize>>,
}

impl Default for InFlight {
    fn default() -> Self {
        let (running, _) = watch::channel(0);
        Self {
            running: Arc::new(running),
        }
    }
}

impl InFlight {
    /// Starts tracking one emission and hands out its completion signal.
    pub(crate) fn start(&self) -> (Dispatch, Completion) {
        let (done, completion) = Completion::channel();
        self.running.send_modify(|running| *running += 1);
        (
            Dispatch {
                done: Some(done),
                running: self.running.clone(),
            },
            completion,
        )
    }

    pub(crate) fn running(&self) -> usize {
        *self.running.borrow()
    }

    pub(crate) async fn idle(&self) {
        let mut running = self.running.subscribe();
        // the sender lives in `self`, so the channel cannot close here
        let _ = running.wait_for(|running| *running == 0).await;
    }
}

/// Owned by a dispatch task for its whole run.
///
/// Dropping it, whether the phases finished, stopped early, or a handler
/// panicked, settles the emission's [`Completion`] and only then releases
/// the in-flight slot. A drained emitter has therefore signalled every
/// completion.
pub(crate) struct Dispatch {
    done: Option<oneshot::Sender<()>>,
    running: Arc<watch::Sender<usize>>,
}

impl Drop for Dispatch {
    fn drop(&mut self) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        self.running.send_modify(|running| *running -= 1);
    }
}
