//! # Invocation configuration.
//!
//! Provides [`InvokeConfig`], the centralized settings for the invocation
//! core and the built-in [`BlockingPool`](crate::BlockingPool).
//!
//! ## Sentinel values
//! - `max_unwrap_depth = 0` → use [`DEFAULT_MAX_UNWRAP_DEPTH`]
//! - `max_workers = 0` → unlimited (ride the runtime's own blocking pool cap)

/// Depth limit applied to wrap/partial chains when no explicit limit is set.
///
/// Real chains are a handful of layers deep; anything approaching this bound
/// indicates a handler graph built in a loop by mistake.
pub const DEFAULT_MAX_UNWRAP_DEPTH: usize = 64;

/// Configuration for the invocation core.
///
/// All fields are public for flexibility. Prefer the helper accessors to
/// avoid sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Copy, Debug)]
pub struct InvokeConfig {
    /// Maximum number of wrap/partial layers to walk when classifying or
    /// resolving a handler.
    ///
    /// - `0` = use [`DEFAULT_MAX_UNWRAP_DEPTH`]
    /// - `n > 0` = at most `n` layers before
    ///   [`InvokeError::UnresolvableChain`](crate::InvokeError::UnresolvableChain)
    pub max_unwrap_depth: usize,

    /// Maximum number of blocking handlers the built-in pool runs at once.
    ///
    /// - `0` = unlimited (no semaphore; the runtime's blocking pool applies)
    /// - `n > 0` = at most `n` concurrent workers
    ///
    /// Only consulted by [`BlockingPool::from_config`](crate::BlockingPool::from_config);
    /// externally injected pools size themselves.
    pub max_workers: usize,
}

impl InvokeConfig {
    /// Returns the effective unwrap depth limit.
    #[inline]
    pub fn unwrap_depth(&self) -> usize {
        if self.max_unwrap_depth == 0 {
            DEFAULT_MAX_UNWRAP_DEPTH
        } else {
            self.max_unwrap_depth
        }
    }

    /// Returns the worker cap as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` concurrent workers
    #[inline]
    pub fn worker_limit(&self) -> Option<usize> {
        if self.max_workers == 0 {
            None
        } else {
            Some(self.max_workers)
        }
    }
}

impl Default for InvokeConfig {
    /// Default configuration: default unwrap depth, unlimited workers.
    fn default() -> Self {
        Self {
            max_unwrap_depth: 0,
            max_workers: 0,
        }
    }
}
