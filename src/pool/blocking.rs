//! Default worker pool over the runtime's blocking threads.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::InvokeConfig;
use crate::pool::{execute_thunk, PoolHandle, Thunk, WorkerPool};

/// Worker pool backed by `tokio::task::spawn_blocking`.
///
/// Unbounded, it rides the runtime's own blocking-thread limits. Bounded, a
/// shared semaphore caps how many submitted thunks run at once; excess
/// submissions queue on the semaphore, not on extra threads. Clones share
/// the cap.
///
/// Work submitted here always runs to completion: neither dropping the
/// handle nor cancelling the awaiting task interrupts a blocking thread.
#[derive(Clone, Debug, Default)]
pub struct BlockingPool {
    limit: Option<Arc<Semaphore>>,
}

impl BlockingPool {
    /// Creates a pool with no cap of its own.
    pub fn unbounded() -> Self {
        Self { limit: None }
    }

    /// Creates a pool running at most `max_workers` thunks at once.
    ///
    /// `0` means unbounded, matching the config sentinel.
    pub fn bounded(max_workers: usize) -> Self {
        Self {
            limit: (max_workers > 0).then(|| Arc::new(Semaphore::new(max_workers))),
        }
    }

    /// Creates a pool sized from [`InvokeConfig::worker_limit`].
    pub fn from_config(config: &InvokeConfig) -> Self {
        match config.worker_limit() {
            Some(max_workers) => Self::bounded(max_workers),
            None => Self::unbounded(),
        }
    }
}

impl WorkerPool for BlockingPool {
    fn submit(&self, thunk: Thunk) -> PoolHandle {
        let (tx, handle) = PoolHandle::channel();
        match &self.limit {
            None => {
                tokio::task::spawn_blocking(move || {
                    let _ = tx.send(execute_thunk(thunk));
                });
            }
            Some(limit) => {
                let limit = Arc::clone(limit);
                tokio::spawn(async move {
                    // Queue on the cap first; the blocking thread is only
                    // taken once a slot is free.
                    let Ok(_permit) = limit.acquire_owned().await else {
                        return;
                    };
                    if let Ok(output) =
                        tokio::task::spawn_blocking(move || execute_thunk(thunk)).await
                    {
                        let _ = tx.send(output);
                    }
                });
            }
        }
        handle
    }
}
