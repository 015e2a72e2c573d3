//! Error types produced by handler invocation.
//!
//! A single enum, [`InvokeError`], covers every way an invocation can end
//! other than a plain result:
//!
//! - [`InvokeError::Handler`] — the handler itself failed; the original error
//!   is carried unchanged and can be recovered with
//!   [`anyhow::Error::downcast_ref`].
//! - [`InvokeError::Cancelled`] — the awaiting caller was cancelled while a
//!   blocking handler ran; surfaced only after the worker finished.
//! - [`InvokeError::UnresolvableChain`] — a wrap/partial chain too deep to
//!   classify. A programming error, not a runtime condition.
//! - [`InvokeError::WorkerLost`] — the pool dropped a submitted thunk without
//!   reporting a result, violating the pool contract.
//!
//! Helper methods (`as_label`, `as_message`) follow the same shape as the
//! rest of the runtime's errors for logs and metrics.

use thiserror::Error;

/// Errors surfaced by [`Invoker::invoke`](crate::Invoker::invoke) and by
/// execution-model classification.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The handler raised an error. The source is the handler's own error,
    /// transported as-is; no retry, no wrapping beyond this variant.
    #[error("handler failed: {source}")]
    Handler {
        /// The error exactly as the handler produced it.
        #[source]
        source: anyhow::Error,
    },

    /// The caller was cancelled while a blocking handler was in flight.
    ///
    /// The worker ran to completion and released its pool slot before this
    /// was raised; the handler's own outcome is discarded.
    #[error("invocation cancelled (deferred until the worker finished)")]
    Cancelled,

    /// A wrap/partial chain exceeded the unwrap depth limit.
    ///
    /// Chains are acyclic by construction, so hitting the limit means the
    /// handler graph is malformed. Fatal; never reported as "sync".
    #[error("handler chain exceeds {limit} layers; cannot classify")]
    UnresolvableChain {
        /// The depth limit that was exceeded.
        limit: usize,
    },

    /// The worker pool dropped the thunk without reporting a result.
    #[error("worker exited without reporting a result")]
    WorkerLost,
}

impl InvokeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            InvokeError::Handler { .. } => "handler_failed",
            InvokeError::Cancelled => "invocation_cancelled",
            InvokeError::UnresolvableChain { .. } => "unresolvable_chain",
            InvokeError::WorkerLost => "worker_lost",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InvokeError::Handler { source } => format!("handler error: {source}"),
            InvokeError::Cancelled => "cancelled after worker completion".to_string(),
            InvokeError::UnresolvableChain { limit } => {
                format!("unresolvable handler chain (limit {limit})")
            }
            InvokeError::WorkerLost => "worker lost before reporting".to_string(),
        }
    }

    /// True for the deferred-cancellation outcome.
    ///
    /// Useful for callers that treat cancellation as a graceful exit rather
    /// than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, InvokeError::Cancelled)
    }

    /// Wraps a handler-raised error, preserving its identity.
    pub fn handler(source: impl Into<anyhow::Error>) -> Self {
        InvokeError::Handler {
            source: source.into(),
        }
    }
}
