//! # The invocation core.
//!
//! [`Invoker::invoke`] runs any handler the same way: build the kwargs from
//! the cause, resolve the wrap/partial chain, then dispatch.
//!
//! ```text
//! invoke(handler, args, cause, kwargs, token)
//!     │
//!     ├─ build_kwargs(cause, kwargs)            (always first)
//!     ├─ resolve chain ──► leaf + merged args
//!     │
//!     ├─ suspending leaf ─► await in place      (native cancellation: drop)
//!     │
//!     └─ blocking leaf ──► ContextSnapshot::capture()
//!                          WorkerPool::submit(thunk)
//!                              thunk: snapshot.enter() + call leaf
//!                          shielded wait:
//!                              select { handle, token } in a loop,
//!                              token fire only recorded, never aborts
//!                          on completion:
//!                              panic ─► resumed
//!                              recorded cancel ─► Err(Cancelled)
//!                              else ─► handler's Ok/Err as-is
//! ```
//!
//! ## Rules
//! - The scheduler thread never blocks: blocking leaves always go through
//!   the pool.
//! - The worker is never aborted. A cancellation arriving mid-flight is
//!   recorded and re-raised only after the worker finished and released its
//!   pool slot; a recorded cancellation wins over the handler's outcome.
//! - The context snapshot is captured at submission time, on the caller's
//!   thread, and re-established inside the worker for the whole call.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::causes::CauseRef;
use crate::config::InvokeConfig;
use crate::context::ContextSnapshot;
use crate::error::InvokeError;
use crate::invoke::detect::{resolve, LeafFn};
use crate::invoke::handler::{CallArgs, HandlerRef, SyncHandlerFn};
use crate::invoke::kwargs::{build_kwargs, ArgValue, Kwargs};
use crate::pool::{Thunk, WorkerPool};

/// Uniform handler invocation over an injected worker pool.
///
/// The pool is a shared, externally configured resource; the invoker only
/// submits work and polls completion. Cheap to clone.
#[derive(Clone)]
pub struct Invoker {
    pool: Arc<dyn WorkerPool>,
    config: InvokeConfig,
}

impl Invoker {
    /// Creates an invoker over the given pool with default settings.
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self::with_config(pool, InvokeConfig::default())
    }

    /// Creates an invoker with explicit settings.
    pub fn with_config(pool: Arc<dyn WorkerPool>, config: InvokeConfig) -> Self {
        Self { pool, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &InvokeConfig {
        &self.config
    }

    /// Invokes a handler with cause-derived kwargs.
    ///
    /// Suspending handlers are awaited in place; their result or error is
    /// returned as-is, and cancelling the calling task cancels them the
    /// ordinary way. Blocking handlers run on the pool under the caller's
    /// context snapshot; `cancel` firing during the wait is deferred until
    /// the worker finishes, then surfaced as [`InvokeError::Cancelled`].
    pub async fn invoke(
        &self,
        handler: &HandlerRef,
        positional: Vec<ArgValue>,
        cause: Option<&CauseRef>,
        explicit: Kwargs,
        cancel: &CancellationToken,
    ) -> Result<Value, InvokeError> {
        let keywords = build_kwargs(cause, &explicit);
        let args = CallArgs::new(positional, keywords);

        let resolved = resolve(handler, args, self.config.unwrap_depth())?;
        match resolved.leaf {
            LeafFn::Async(call) => call(resolved.args)
                .await
                .map_err(|source| InvokeError::Handler { source }),
            LeafFn::Sync(call) => {
                self.offload(resolved.name, call, resolved.args, cancel).await
            }
        }
    }

    /// Runs a blocking leaf on the pool with deferred cancellation.
    async fn offload(
        &self,
        name: Cow<'static, str>,
        call: Arc<SyncHandlerFn>,
        args: CallArgs,
        cancel: &CancellationToken,
    ) -> Result<Value, InvokeError> {
        // Captured here, on the caller's thread, not when the worker starts.
        let snapshot = ContextSnapshot::capture();
        let thunk: Thunk = Box::new(move || {
            let _ambient = snapshot.enter();
            call(args)
        });

        tracing::debug!(handler = %name, "offloading blocking handler to the worker pool");
        let mut handle = self.pool.submit(thunk);

        // A cancellation that predates the wait defers exactly like one
        // arriving mid-flight.
        let mut cancelled = cancel.is_cancelled();
        let outcome = loop {
            tokio::select! {
                outcome = &mut handle => break outcome,
                _ = cancel.cancelled(), if !cancelled => {
                    cancelled = true;
                    tracing::debug!(
                        handler = %name,
                        "cancellation requested; waiting for the worker to finish"
                    );
                }
            }
        };

        let output = outcome.ok_or(InvokeError::WorkerLost)?;
        let result = match output {
            Ok(result) => result,
            // A worker panic is a crash, not a handler outcome.
            Err(payload) => std::panic::resume_unwind(payload),
        };

        if cancelled {
            tracing::debug!(handler = %name, "worker finished; surfacing deferred cancellation");
            return Err(InvokeError::Cancelled);
        }
        result.map_err(|source| InvokeError::Handler { source })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::invoke::handler::Handler;
    use crate::pool::{execute_thunk, PoolHandle};

    /// Pool fake: counts submissions and in-flight workers, runs thunks on
    /// plain threads.
    #[derive(Default)]
    struct CountingPool {
        submitted: AtomicUsize,
        in_flight: Arc<AtomicUsize>,
    }

    impl WorkerPool for CountingPool {
        fn submit(&self, thunk: Thunk) -> PoolHandle {
            self.submitted.fetch_add(1, Ordering::SeqCst);
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let in_flight = Arc::clone(&self.in_flight);
            let (tx, handle) = PoolHandle::channel();
            std::thread::spawn(move || {
                let output = execute_thunk(thunk);
                // The slot is free before the result is even delivered.
                in_flight.fetch_sub(1, Ordering::SeqCst);
                let _ = tx.send(output);
            });
            handle
        }
    }

    fn invoker_with_pool() -> (Invoker, Arc<CountingPool>) {
        let pool = Arc::new(CountingPool::default());
        let invoker = Invoker::new(Arc::clone(&pool) as Arc<dyn WorkerPool>);
        (invoker, pool)
    }

    #[derive(Debug, PartialEq, Eq)]
    struct HandlerFault(&'static str);

    impl std::fmt::Display for HandlerFault {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "handler fault: {}", self.0)
        }
    }

    impl std::error::Error for HandlerFault {}

    #[tokio::test]
    async fn test_async_handler_result_no_pool_involved() {
        let (invoker, pool) = invoker_with_pool();
        let handler = Handler::from_async("answer", |_args| async { Ok(json!(42)) });

        let result = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
            .await
            .expect("handler succeeds");

        assert_eq!(result, json!(42));
        assert_eq!(pool.submitted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sync_handler_runs_on_pool() {
        let (invoker, pool) = invoker_with_pool();
        let handler = Handler::from_sync("compute", |_args| Ok(json!("done")));

        let result = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
            .await
            .expect("handler succeeds");

        assert_eq!(result, json!("done"));
        assert_eq!(pool.submitted.load(Ordering::SeqCst), 1);
        assert_eq!(pool.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sync_handler_error_keeps_identity_and_kwargs() {
        let (invoker, _pool) = invoker_with_pool();
        let seen: Arc<Mutex<Option<Kwargs>>> = Arc::new(Mutex::new(None));
        let seen_in_handler = Arc::clone(&seen);

        let handler = Handler::from_sync("failing", move |args| {
            *seen_in_handler.lock().expect("lock") = Some(args.keywords.clone());
            Err(HandlerFault("broken").into())
        });

        let mut explicit = Kwargs::new();
        explicit.insert("param", ArgValue::from("value"));

        let err = invoker
            .invoke(
                &handler,
                vec![ArgValue::from("a"), ArgValue::from("b")],
                None,
                explicit,
                &CancellationToken::new(),
            )
            .await
            .expect_err("handler fails");

        match err {
            InvokeError::Handler { source } => {
                let fault = source
                    .downcast_ref::<HandlerFault>()
                    .expect("original error type preserved");
                assert_eq!(*fault, HandlerFault("broken"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let observed = seen.lock().expect("lock").take().expect("handler ran");
        assert_eq!(observed.get("param").and_then(ArgValue::as_text), Some("value"));
    }

    #[tokio::test]
    async fn test_async_handler_error_passes_through() {
        let (invoker, _pool) = invoker_with_pool();
        let handler =
            Handler::from_async("failing", |_args| async { Err(HandlerFault("async").into()) });

        let err = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
            .await
            .expect_err("handler fails");

        match err {
            InvokeError::Handler { source } => {
                assert!(source.downcast_ref::<HandlerFault>().is_some());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancellation_is_deferred_until_worker_finishes() {
        let (invoker, pool) = invoker_with_pool();
        let side_effects = Arc::new(AtomicUsize::new(0));
        let side_effects_in_handler = Arc::clone(&side_effects);

        let handler = Handler::from_sync("slow", move |_args| {
            std::thread::sleep(Duration::from_millis(120));
            side_effects_in_handler.fetch_add(1, Ordering::SeqCst);
            Ok(json!("never delivered"))
        });

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &cancel)
            .await
            .expect_err("cancellation surfaces");

        assert!(err.is_cancellation());
        assert_eq!(
            side_effects.load(Ordering::SeqCst),
            1,
            "the worker ran to completion exactly once"
        );
        assert_eq!(
            pool.in_flight.load(Ordering::SeqCst),
            0,
            "the pool slot was released"
        );
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_handler_error() {
        let (invoker, _pool) = invoker_with_pool();
        let handler = Handler::from_sync("slow-failing", |_args| {
            std::thread::sleep(Duration::from_millis(80));
            Err(HandlerFault("late").into())
        });

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &cancel)
            .await
            .expect_err("cancellation surfaces");
        assert!(err.is_cancellation());
    }

    #[tokio::test]
    async fn test_already_cancelled_token_still_completes_worker() {
        let (invoker, _pool) = invoker_with_pool();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_in_handler = Arc::clone(&ran);
        let handler = Handler::from_sync("quick", move |_args| {
            ran_in_handler.fetch_add(1, Ordering::SeqCst);
            Ok(json!("ok"))
        });

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &cancel)
            .await
            .expect_err("cancellation surfaces");
        assert!(err.is_cancellation());
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_partial_bound_kwargs_reach_the_leaf() {
        let (invoker, _pool) = invoker_with_pool();
        let handler = Handler::from_sync("greet", |args: CallArgs| {
            let who = args
                .keywords
                .get("who")
                .and_then(ArgValue::as_text)
                .unwrap_or("nobody")
                .to_string();
            Ok(json!(who))
        });
        let mut bound = Kwargs::new();
        bound.insert("who", ArgValue::from("operator"));
        let partial = handler.partial(Vec::new(), bound);

        let result = invoker
            .invoke(&partial, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
            .await
            .expect("handler succeeds");
        assert_eq!(result, json!("operator"));
    }

    #[tokio::test]
    async fn test_async_handler_with_cause_sees_aliases() {
        use crate::causes::{Body, Cause, Diff, Reason, ResourceCause, ResourceChangingCause};

        let (invoker, pool) = invoker_with_pool();
        let resource = ResourceCause::new(Arc::new(Body::new(json!({
            "metadata": {"name": "demo", "namespace": "ns"},
        }))));
        let cause: CauseRef = Arc::new(Cause::ResourceChanging(ResourceChangingCause {
            resource,
            reason: Reason::Update,
            diff: Diff::new(),
            old: None,
            new: None,
        }));

        let handler = Handler::from_async("typed", |args: CallArgs| async move {
            let reason = args.keywords.get("reason").and_then(ArgValue::as_reason);
            assert_eq!(reason, Some(crate::causes::Reason::Update));
            Ok(json!(42))
        });

        let result = invoker
            .invoke(&handler, Vec::new(), Some(&cause), Kwargs::new(), &CancellationToken::new())
            .await
            .expect("handler succeeds");

        assert_eq!(result, json!(42));
        assert_eq!(pool.submitted.load(Ordering::SeqCst), 0, "no pool involvement");
    }

    #[tokio::test]
    async fn test_current_cause_visible_inside_worker() {
        use crate::causes::{Activity, ActivityCause, Cause};
        use crate::context::{cause_var, current_cause, ContextScope};

        let (invoker, _pool) = invoker_with_pool();
        let cause: CauseRef = Arc::new(Cause::Activity(ActivityCause::new(Activity::Probe)));
        let _scope = ContextScope::enter([cause_var().bind(Arc::clone(&cause))]);

        let handler = Handler::from_sync("owner-defaulting", |_args| {
            // What the hierarchy utilities do: read the ambient cause.
            Ok(json!(current_cause().is_some()))
        });

        let result = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
            .await
            .expect("handler succeeds");
        assert_eq!(result, json!(true));
    }

    #[tokio::test]
    async fn test_context_snapshot_reaches_the_worker_thread() {
        use crate::context::{ContextScope, ContextVar};

        let (invoker, _pool) = invoker_with_pool();
        let var: ContextVar<String> = ContextVar::new("invoker-ambient");
        let _scope = ContextScope::enter([var.bind(Arc::new("from-caller".to_string()))]);

        let handler = Handler::from_sync("ambient-reader", move |_args| {
            let seen = var
                .get()
                .map(|value| value.as_str().to_string())
                .unwrap_or_default();
            Ok(json!(seen))
        });

        let result = invoker
            .invoke(&handler, Vec::new(), None, Kwargs::new(), &CancellationToken::new())
            .await
            .expect("handler succeeds");
        assert_eq!(result, json!("from-caller"));
    }
}
