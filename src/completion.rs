use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Completion signal for a single emission.
///
/// Returned by [`Emitter::emit`](crate::Emitter::emit) and
/// [`Emitter::emit_once`](crate::Emitter::emit_once). Awaiting it resolves
/// once the before/main/after chain has finished or stopped early. Handler
/// errors are never reported here; they go to the emitter's logger.
///
/// Dropping a `Completion` does not cancel the dispatch.
#[derive(Debug)]
pub struct Completion {
    /// A dropped sender also counts as done.
    done: oneshot::Receiver<()>,
    settled: bool,
}

impl Completion {
    pub(crate) fn channel() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                done: rx,
                settled: false,
            },
        )
    }

    pub fn try_done(&mut self) -> bool {
        if !self.settled {
            self.settled = !matches!(self.done.try_recv(), Err(TryRecvError::Empty));
        }
        self.settled
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.settled {
            return Poll::Ready(());
        }
        Pin::new(&mut this.done).poll(cx).map(|_| {
            this.settled = true;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_after_send() {
        let (tx, mut completion) = Completion::channel();
        assert!(!completion.try_done());

        tx.send(()).unwrap();
        assert!(completion.try_done());
        completion.await;
    }

    #[tokio::test]
    async fn resolves_when_sender_is_dropped() {
        let (tx, completion) = Completion::channel();
        drop(tx);
        completion.await;
    }
}
