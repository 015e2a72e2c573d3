//! Scoped binding of context variables.

use crate::context::var::{BindToken, Binding};

/// RAII guard that binds context variables for the duration of a block.
///
/// On creation, binds each value in sequence, recording the prior state. On
/// drop (normal exit, early return, or panic unwind alike), restores every
/// variable in reverse order of binding. Restoration is an infallible stack
/// truncation per variable, so one restore can never prevent the rest.
///
/// Zero bindings is a valid no-op scope.
///
/// ```
/// use std::sync::Arc;
/// use causeway::{ContextScope, ContextVar};
///
/// let var: ContextVar<u32> = ContextVar::new("answer");
/// {
///     let _scope = ContextScope::enter([var.bind(Arc::new(42))]);
///     assert_eq!(var.get().as_deref(), Some(&42));
/// }
/// assert!(var.get().is_none());
/// ```
#[must_use = "bindings are restored when the scope is dropped"]
pub struct ContextScope {
    tokens: Vec<BindToken>,
}

impl ContextScope {
    /// Binds the given (variable, value) pairs, in order.
    pub fn enter<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = Binding>,
    {
        let tokens = bindings.into_iter().map(|binding| binding.push()).collect();
        Self { tokens }
    }

    /// Number of bindings held by this scope.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True for the zero-binding no-op scope.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        // Most-recently-bound resets first.
        for token in self.tokens.drain(..).rev() {
            token.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::ContextVar;

    #[test]
    fn test_zero_bindings_is_noop() {
        let scope = ContextScope::enter([]);
        assert!(scope.is_empty());
        drop(scope);
    }

    #[test]
    fn test_restores_in_reverse_after_normal_exit() {
        let a: ContextVar<u32> = ContextVar::new("scope-a");
        let b: ContextVar<u32> = ContextVar::new("scope-b");
        let outer = ContextScope::enter([a.bind(Arc::new(1)), b.bind(Arc::new(2))]);
        {
            let inner = ContextScope::enter([a.bind(Arc::new(10)), b.bind(Arc::new(20))]);
            assert_eq!(a.get().as_deref(), Some(&10));
            assert_eq!(b.get().as_deref(), Some(&20));
            drop(inner);
        }
        assert_eq!(a.get().as_deref(), Some(&1));
        assert_eq!(b.get().as_deref(), Some(&2));
        drop(outer);
        assert!(a.get().is_none());
        assert!(b.get().is_none());
    }

    #[test]
    fn test_restores_after_panic_exit() {
        let var: ContextVar<u32> = ContextVar::new("scope-panic");
        let outer = ContextScope::enter([var.bind(Arc::new(1))]);

        let result = std::panic::catch_unwind(|| {
            let _inner = ContextScope::enter([var.bind(Arc::new(99))]);
            panic!("boom");
        });
        assert!(result.is_err());

        assert_eq!(
            var.get().as_deref(),
            Some(&1),
            "panic unwind must restore the prior binding"
        );
        drop(outer);
        assert!(var.get().is_none());
    }

    #[test]
    fn test_same_var_bound_twice_in_one_scope() {
        let var: ContextVar<u32> = ContextVar::new("scope-twice");
        let scope = ContextScope::enter([var.bind(Arc::new(1)), var.bind(Arc::new(2))]);
        assert_eq!(var.get().as_deref(), Some(&2));
        drop(scope);
        assert!(var.get().is_none());
    }
}
