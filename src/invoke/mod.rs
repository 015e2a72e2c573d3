//! Invocation core: kwargs assembly, classification, dispatch.
//!
//! Internal modules:
//! - [`kwargs`]: keyword-argument maps and the cause overlay;
//! - [`handler`]: the handler chain (leaves, partials, wrappers);
//! - [`detect`]: execution-model classification and chain resolution;
//! - [`invoker`]: dispatch with the cancellation-safe pool offload.

mod detect;
mod handler;
mod invoker;
mod kwargs;

pub use detect::{is_async, is_async_within};
pub use handler::{
    AsyncHandlerFn, CallArgs, Handler, HandlerRef, HandlerResult, SyncHandlerFn,
};
pub use invoker::Invoker;
pub use kwargs::{build_kwargs, ArgValue, Kwargs};
