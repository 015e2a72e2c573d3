//! # Ambient context variables crossing the scheduler/worker boundary.
//!
//! The invocation core snapshots every bound context variable at the moment
//! a blocking handler is submitted, and re-establishes the snapshot inside
//! the worker thread for the duration of the call. Nothing here relies on
//! implicit thread inheritance: the snapshot is explicit and immutable, and
//! [`ContextScope`] is the only mutator, always restoring prior values.
//!
//! ## Pieces
//! - [`ContextVar`]: a registered, dynamically scoped variable with a
//!   per-thread stack of bindings.
//! - [`ContextScope`]: RAII guard that binds values and restores them in
//!   reverse order on every exit path.
//! - [`ContextSnapshot`]: the frozen top-of-stack values of all registered
//!   variables; `Send`, so it can ride into a worker thunk.
//!
//! ## The current-cause variable
//! [`cause_var`] / [`current_cause`] are the coupling point for the
//! hierarchy utilities that default an owner object from "the resource
//! currently being handled". Upstream handling machinery binds it; this core
//! only guarantees the binding survives the pool offload.

mod scope;
mod snapshot;
mod var;

pub use scope::ContextScope;
pub use snapshot::ContextSnapshot;
pub use var::{Binding, ContextVar};

use std::sync::OnceLock;

use crate::causes::{Cause, CauseRef};

/// The ambient "cause currently being handled" variable.
pub fn cause_var() -> ContextVar<Cause> {
    static CAUSE_VAR: OnceLock<ContextVar<Cause>> = OnceLock::new();
    *CAUSE_VAR.get_or_init(|| ContextVar::new("current-cause"))
}

/// Reads the ambient current cause, if one is bound on this thread.
pub fn current_cause() -> Option<CauseRef> {
    cause_var().get()
}
