//! # Worker pools: where blocking handlers actually run.
//!
//! The pool is an external collaborator. The invocation core only submits
//! thunks and observes completion; it never resizes, closes, or otherwise
//! mutates pool state. Identity is injected ([`Invoker::new`](crate::Invoker::new)
//! takes an `Arc<dyn WorkerPool>`), which keeps the core testable with fakes.
//!
//! - [`WorkerPool`]: the submission contract.
//! - [`PoolHandle`]: eventual completion; non-blocking check plus awaitable
//!   result, with worker panics carried through for re-raising.
//! - [`BlockingPool`]: default implementation over the runtime's blocking
//!   thread pool, optionally capped by a semaphore.

mod blocking;
mod handle;
mod worker_pool;

pub use blocking::BlockingPool;
pub use handle::PoolHandle;
pub use worker_pool::{execute_thunk, Thunk, ThunkOutput, WorkerPool};
