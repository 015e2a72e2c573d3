//! Completion handles for submitted thunks.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::pool::ThunkOutput;

enum HandleState {
    /// Still waiting for the worker's report.
    Pending(oneshot::Receiver<ThunkOutput>),
    /// Output arrived via a non-blocking check, not yet consumed.
    Ready(Option<ThunkOutput>),
    /// Output consumed, or the worker vanished without reporting.
    Gone,
}

/// Eventual completion of one submitted thunk.
///
/// Await it to obtain the worker's report: `Some(output)` once, or `None`
/// if the worker dropped its sender without reporting (a pool contract
/// violation). [`PoolHandle::is_finished`] checks completion without
/// blocking or consuming the output.
///
/// The handle only observes the worker; dropping it never cancels the
/// underlying work.
pub struct PoolHandle {
    state: HandleState,
}

impl PoolHandle {
    /// Wraps a receiver carrying the worker's eventual report.
    pub fn new(receiver: oneshot::Receiver<ThunkOutput>) -> Self {
        Self {
            state: HandleState::Pending(receiver),
        }
    }

    /// Creates a connected (sender, handle) pair.
    ///
    /// Convenience for pool implementations: send the [`ThunkOutput`]
    /// through the sender when the worker finishes.
    pub fn channel() -> (oneshot::Sender<ThunkOutput>, PoolHandle) {
        let (tx, rx) = oneshot::channel();
        (tx, PoolHandle::new(rx))
    }

    /// True once the worker has reported (or provably never will).
    ///
    /// Non-blocking; a ready output is retained for the subsequent await.
    pub fn is_finished(&mut self) -> bool {
        match &mut self.state {
            HandleState::Ready(_) | HandleState::Gone => true,
            HandleState::Pending(receiver) => match receiver.try_recv() {
                Ok(output) => {
                    self.state = HandleState::Ready(Some(output));
                    true
                }
                Err(oneshot::error::TryRecvError::Empty) => false,
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.state = HandleState::Gone;
                    true
                }
            },
        }
    }
}

impl Future for PoolHandle {
    type Output = Option<ThunkOutput>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            HandleState::Ready(slot) => {
                let output = slot.take();
                this.state = HandleState::Gone;
                Poll::Ready(output)
            }
            HandleState::Gone => Poll::Ready(None),
            HandleState::Pending(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Ready(Ok(output)) => {
                    this.state = HandleState::Gone;
                    Poll::Ready(Some(output))
                }
                Poll::Ready(Err(_)) => {
                    this.state = HandleState::Gone;
                    Poll::Ready(None)
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
