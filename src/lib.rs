//! # causeway
//!
//! **Causeway** is the callback-invocation core of an event-driven operator
//! runtime: it invokes user-supplied handlers, blocking or suspending,
//! through one uniform protocol.
//!
//! Handler authors do not know (and must not care) which execution model the
//! framework uses. Causeway classifies each handler by unwrapping its
//! wrap/partial layers, enriches the argument list from a typed *cause*, and
//! runs blocking handlers on a worker pool without ever blocking the
//! scheduler thread or abandoning an in-flight worker.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      Handler (sync | async, zero or more wrap/partial layers)
//!          │
//!          ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Invoker::invoke                                                  │
//! │  - build_kwargs: overlay cause tiers onto explicit kwargs         │
//! │  - resolve: walk the chain to the leaf, merge bound arguments     │
//! └──────┬──────────────────────────────────┬─────────────────────────┘
//!        │ suspending leaf                  │ blocking leaf
//!        ▼                                  ▼
//!   await in place                  ContextSnapshot::capture()
//!   (drop = native cancel)          WorkerPool::submit(thunk)
//!                                          │
//!                                          ▼
//!                                   worker thread:
//!                                     snapshot.enter() ► call leaf
//!                                          │
//!                                          ▼
//!                                   shielded wait loop:
//!                                     select { handle, token }
//!                                     token fire → recorded, wait again
//!                                     handle done → panic? cancel? result
//! ```
//!
//! ### Cancellation of the blocking path
//! ```text
//! Submitted ──► Waiting ──► (repeat Waiting on recorded cancel) ──► Completed
//!                                                                      │
//!                       ┌──────────────────────┬───────────────────────┤
//!                       ▼                      ▼                       ▼
//!                   Returned        Raised-Handler-Error   Raised-Deferred-Cancellation
//! ```
//!
//! The worker pool is a shared, finite resource: aborting a thread would
//! leak its slot. A cancellation arriving while the worker runs is therefore
//! recorded and surfaced only after the worker finished and the slot is
//! back; the handler runs to completion even for a caller that no longer
//! wants the result.
//!
//! ## Features
//! | Area            | Description                                             | Key types / traits                    |
//! |-----------------|---------------------------------------------------------|---------------------------------------|
//! | **Causes**      | Typed context describing why a handler runs.            | [`Cause`], [`CauseRef`], [`Reason`]   |
//! | **Kwargs**      | Cause-derived argument maps passed to handlers.         | [`Kwargs`], [`ArgValue`], [`build_kwargs`] |
//! | **Handlers**    | Sync/async callbacks with wrap/partial layers.          | [`Handler`], [`HandlerRef`], [`is_async`] |
//! | **Invocation**  | Uniform dispatch with deferred cancellation.            | [`Invoker`], [`InvokeConfig`]         |
//! | **Pools**       | Injected worker pools for blocking handlers.            | [`WorkerPool`], [`PoolHandle`], [`BlockingPool`] |
//! | **Context**     | Ambient variables snapshotted across the pool boundary. | [`ContextVar`], [`ContextScope`], [`ContextSnapshot`] |
//! | **Errors**      | Typed invocation outcomes.                              | [`InvokeError`]                       |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use causeway::{BlockingPool, CallArgs, Handler, Invoker, Kwargs};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), causeway::InvokeError> {
//!     let invoker = Invoker::new(Arc::new(BlockingPool::unbounded()));
//!
//!     // A blocking handler: runs on a worker thread, never on the scheduler.
//!     let hello = Handler::from_sync("hello", |_args: CallArgs| {
//!         Ok(serde_json::json!("hi"))
//!     });
//!
//!     let result = invoker
//!         .invoke(&hello, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
//!         .await?;
//!     assert_eq!(result, serde_json::json!("hi"));
//!     Ok(())
//! }
//! ```

mod causes;
mod config;
mod context;
mod error;
mod invoke;
mod pool;

// ---- Public re-exports ----

pub use causes::{
    Activity, ActivityCause, Body, Cause, CauseRef, Diff, DiffItem, DiffOp, DocView, Logger,
    Memo, Patch, Reason, ResourceCause, ResourceChangingCause, ResourceWatchingCause,
};
pub use config::{InvokeConfig, DEFAULT_MAX_UNWRAP_DEPTH};
pub use context::{cause_var, current_cause, Binding, ContextScope, ContextSnapshot, ContextVar};
pub use error::InvokeError;
pub use invoke::{
    build_kwargs, is_async, is_async_within, ArgValue, AsyncHandlerFn, CallArgs, Handler,
    HandlerRef, HandlerResult, Invoker, Kwargs, SyncHandlerFn,
};
pub use pool::{execute_thunk, BlockingPool, PoolHandle, Thunk, ThunkOutput, WorkerPool};
