//! # Handlers: user-supplied callbacks, blocking or suspending, wrapped or not.
//!
//! A [`Handler`] is either a leaf (a blocking function or a suspending one)
//! or a layer around another handler: a partial application binding extra
//! arguments, or a named wrapper installed by a decorating construct. Layers
//! expose the inner target through [`Handler::unwrapped`]; classification
//! and resolution walk that chain to the leaf.
//!
//! Handlers receive a single [`CallArgs`] bundle and must tolerate keyword
//! arguments they do not use.
//!
//! ## Example
//! ```rust
//! use causeway::{CallArgs, Handler, Kwargs};
//!
//! let leaf = Handler::from_sync("double", |args: CallArgs| {
//!     let n = args
//!         .keywords
//!         .get("n")
//!         .and_then(|value| value.as_json())
//!         .and_then(|value| value.as_i64())
//!         .unwrap_or(0);
//!     Ok(serde_json::json!(n * 2))
//! });
//!
//! let mut bound = Kwargs::new();
//! bound.insert("n", causeway::ArgValue::Json(serde_json::json!(21)));
//! let partial = leaf.partial(Vec::new(), bound);
//! assert_eq!(partial.name(), "double");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::config::DEFAULT_MAX_UNWRAP_DEPTH;
use crate::invoke::kwargs::{ArgValue, Kwargs};

/// What a handler call produces: a JSON-able value or the handler's own error.
pub type HandlerResult = Result<Value, anyhow::Error>;

/// Call signature of a blocking leaf.
pub type SyncHandlerFn = dyn Fn(CallArgs) -> HandlerResult + Send + Sync;

/// Call signature of a suspending leaf.
pub type AsyncHandlerFn = dyn Fn(CallArgs) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// Shared handle to a handler.
pub type HandlerRef = Arc<Handler>;

/// Positional and keyword arguments for one call.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    /// Positional arguments, in order.
    pub positional: Vec<ArgValue>,
    /// Keyword arguments; unknown keys must be tolerated by handlers.
    pub keywords: Kwargs,
}

impl CallArgs {
    /// Bundles positional and keyword arguments.
    pub fn new(positional: Vec<ArgValue>, keywords: Kwargs) -> Self {
        Self {
            positional,
            keywords,
        }
    }
}

/// A user-supplied callback, possibly wrapped.
pub enum Handler {
    /// Blocking leaf; runs on a worker thread.
    Sync {
        /// Handler name for logs.
        name: Cow<'static, str>,
        /// The function itself.
        call: Arc<SyncHandlerFn>,
    },
    /// Suspending leaf; awaited on the scheduler.
    Async {
        /// Handler name for logs.
        name: Cow<'static, str>,
        /// The future-producing function.
        call: Arc<AsyncHandlerFn>,
    },
    /// Partial application: binds arguments, delegates to `inner`.
    ///
    /// Bound arguments are irrelevant to execution-model classification;
    /// at call time they are merged innermost-first, call-site last.
    Partial {
        /// The wrapped target.
        inner: HandlerRef,
        /// Bound positional arguments, prepended to the call's.
        positional: Vec<ArgValue>,
        /// Bound keyword arguments, overridden by outer layers and the call.
        keywords: Kwargs,
    },
    /// Decorator layer: a named wrapper with an inner-target back-reference.
    Wrapped {
        /// The wrapper's own name.
        name: Cow<'static, str>,
        /// The wrapped target.
        inner: HandlerRef,
    },
}

impl Handler {
    /// Creates a blocking leaf handler.
    pub fn from_sync<F>(name: impl Into<Cow<'static, str>>, call: F) -> HandlerRef
    where
        F: Fn(CallArgs) -> HandlerResult + Send + Sync + 'static,
    {
        Arc::new(Handler::Sync {
            name: name.into(),
            call: Arc::new(call),
        })
    }

    /// Creates a suspending leaf handler from an async function or closure.
    pub fn from_async<F, Fut>(name: impl Into<Cow<'static, str>>, call: F) -> HandlerRef
    where
        F: Fn(CallArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let boxed = move |args: CallArgs| -> BoxFuture<'static, HandlerResult> {
            Box::pin(call(args))
        };
        Arc::new(Handler::Async {
            name: name.into(),
            call: Arc::new(boxed),
        })
    }

    /// Wraps this handler in a partial-application layer.
    pub fn partial(self: Arc<Self>, positional: Vec<ArgValue>, keywords: Kwargs) -> HandlerRef {
        Arc::new(Handler::Partial {
            inner: self,
            positional,
            keywords,
        })
    }

    /// Wraps this handler in a named decorator layer.
    pub fn wrapped(self: Arc<Self>, name: impl Into<Cow<'static, str>>) -> HandlerRef {
        Arc::new(Handler::Wrapped {
            name: name.into(),
            inner: self,
        })
    }

    /// The inner target, if this is a wrapping/partial layer.
    pub fn unwrapped(&self) -> Option<&HandlerRef> {
        match self {
            Handler::Partial { inner, .. } | Handler::Wrapped { inner, .. } => Some(inner),
            _ => None,
        }
    }

    /// The handler's display name: its own, or the nearest named layer's.
    pub fn name(&self) -> &str {
        let mut current = self;
        for _ in 0..=DEFAULT_MAX_UNWRAP_DEPTH {
            match current {
                Handler::Sync { name, .. }
                | Handler::Async { name, .. }
                | Handler::Wrapped { name, .. } => return name.as_ref(),
                Handler::Partial { inner, .. } => current = inner.as_ref(),
            }
        }
        "<unresolved>"
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Sync { name, .. } => f.debug_struct("Sync").field("name", name).finish(),
            Handler::Async { name, .. } => f.debug_struct("Async").field("name", name).finish(),
            Handler::Partial {
                positional,
                keywords,
                ..
            } => f
                .debug_struct("Partial")
                .field("positional", &positional.len())
                .field("keywords", &keywords.len())
                .finish(),
            Handler::Wrapped { name, .. } => f.debug_struct("Wrapped").field("name", name).finish(),
        }
    }
}
