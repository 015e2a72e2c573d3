//! The pool submission contract.

use crate::invoke::HandlerResult;
use crate::pool::PoolHandle;

/// A ready-to-run unit of blocking work: leaf handler, arguments, and the
/// caller's context snapshot, already bound together.
pub type Thunk = Box<dyn FnOnce() -> HandlerResult + Send + 'static>;

/// What a worker reports back: the thunk's result, or the panic payload if
/// the thunk unwound.
pub type ThunkOutput = std::thread::Result<HandlerResult>;

/// A bounded set of worker threads (or processes) that runs thunks.
///
/// Implementations must run every submitted thunk to completion and deliver
/// its [`ThunkOutput`] through the returned handle. Dropping a thunk without
/// reporting violates the contract and surfaces to callers as
/// [`InvokeError::WorkerLost`](crate::InvokeError::WorkerLost).
pub trait WorkerPool: Send + Sync {
    /// Submits a thunk; returns a handle to its eventual completion.
    fn submit(&self, thunk: Thunk) -> PoolHandle;
}

/// Runs a thunk, capturing a panic as its output.
///
/// Pool implementations wrap thunk execution with this so a panicking
/// handler reports instead of tearing down the worker silently; the payload
/// is re-raised on the awaiting side.
pub fn execute_thunk(thunk: Thunk) -> ThunkOutput {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(thunk))
}
