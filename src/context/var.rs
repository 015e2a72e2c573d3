//! Dynamically scoped variables with per-thread binding stacks.
//!
//! Each variable owns a stack of values per thread; the most recent binding
//! wins and is reset first. Variables register themselves in a process-wide
//! registry so snapshots can enumerate them without knowing their types.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

type SharedValue = Arc<dyn Any + Send + Sync>;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy)]
struct VarInfo {
    id: u64,
    name: &'static str,
}

fn registry() -> &'static RwLock<Vec<VarInfo>> {
    static REGISTRY: OnceLock<RwLock<Vec<VarInfo>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Vec::new()))
}

thread_local! {
    static STACKS: RefCell<HashMap<u64, Vec<SharedValue>>> = RefCell::new(HashMap::new());
}

/// A registered, dynamically scoped variable holding values of type `T`.
///
/// The handle is `Copy`; all state lives in per-thread stacks. Create once
/// (typically behind a `OnceLock`) and pass the handle around freely.
pub struct ContextVar<T> {
    id: u64,
    name: &'static str,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Clone for ContextVar<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContextVar<T> {}

impl<T> fmt::Debug for ContextVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextVar")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<T: Send + Sync + 'static> ContextVar<T> {
    /// Creates and registers a new variable.
    ///
    /// Registration is permanent; variables are expected to be process-long
    /// singletons, not per-request objects.
    pub fn new(name: &'static str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        registry().write().push(VarInfo { id, name });
        Self {
            id,
            name,
            _marker: PhantomData,
        }
    }

    /// The registration name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the current (most recent) binding on this thread.
    pub fn get(&self) -> Option<Arc<T>> {
        let value = STACKS.with(|stacks| {
            stacks
                .borrow()
                .get(&self.id)
                .and_then(|stack| stack.last().cloned())
        })?;
        value.downcast::<T>().ok()
    }

    /// True if the variable is bound on this thread.
    pub fn is_set(&self) -> bool {
        STACKS.with(|stacks| {
            stacks
                .borrow()
                .get(&self.id)
                .is_some_and(|stack| !stack.is_empty())
        })
    }

    /// Pairs the variable with a value, ready to be entered via
    /// [`ContextScope`](crate::ContextScope).
    pub fn bind(&self, value: Arc<T>) -> Binding {
        Binding {
            id: self.id,
            value,
        }
    }
}

/// One (variable, value) pair, type-erased so scopes and snapshots can hold
/// mixed variables.
#[derive(Clone)]
pub struct Binding {
    id: u64,
    value: SharedValue,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("id", &self.id).finish()
    }
}

impl Binding {
    /// Pushes the value onto the variable's stack on this thread.
    pub(crate) fn push(&self) -> BindToken {
        STACKS.with(|stacks| {
            let mut map = stacks.borrow_mut();
            let stack = map.entry(self.id).or_default();
            let depth = stack.len();
            stack.push(Arc::clone(&self.value));
            BindToken {
                id: self.id,
                depth,
            }
        })
    }
}

/// Restoration token: records the stack depth before the push.
///
/// Restoring truncates back to that depth, so a single failed or skipped
/// restore cannot corrupt the others; each token is independent.
pub(crate) struct BindToken {
    id: u64,
    depth: usize,
}

impl BindToken {
    pub(crate) fn restore(self) {
        STACKS.with(|stacks| {
            let mut map = stacks.borrow_mut();
            if let Some(stack) = map.get_mut(&self.id) {
                stack.truncate(self.depth);
            }
        });
    }
}

/// Captures the top-of-stack value of every registered variable on this
/// thread, in registration order.
pub(crate) fn capture_all() -> Vec<Binding> {
    let infos: Vec<VarInfo> = registry().read().clone();
    STACKS.with(|stacks| {
        let map = stacks.borrow();
        infos
            .iter()
            .filter_map(|info| {
                let value = map.get(&info.id)?.last()?;
                Some(Binding {
                    id: info.id,
                    value: Arc::clone(value),
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextScope;

    #[test]
    fn test_unset_var_reads_none() {
        let var: ContextVar<u32> = ContextVar::new("test-unset");
        assert!(var.get().is_none());
        assert!(!var.is_set());
    }

    #[test]
    fn test_bind_and_read_back() {
        let var: ContextVar<u32> = ContextVar::new("test-bind");
        let scope = ContextScope::enter([var.bind(Arc::new(7))]);
        assert_eq!(var.get().as_deref(), Some(&7));
        drop(scope);
        assert!(var.get().is_none());
    }

    #[test]
    fn test_nested_bindings_stack() {
        let var: ContextVar<&'static str> = ContextVar::new("test-nested");
        let outer = ContextScope::enter([var.bind(Arc::new("outer"))]);
        {
            let inner = ContextScope::enter([var.bind(Arc::new("inner"))]);
            assert_eq!(var.get().as_deref(), Some(&"inner"));
            drop(inner);
        }
        assert_eq!(var.get().as_deref(), Some(&"outer"));
        drop(outer);
        assert!(var.get().is_none());
    }

    #[test]
    fn test_vars_are_thread_isolated() {
        let var: ContextVar<u32> = ContextVar::new("test-isolated");
        let _scope = ContextScope::enter([var.bind(Arc::new(1))]);
        let seen = std::thread::spawn(move || var.get().is_some())
            .join()
            .expect("thread panicked");
        assert!(!seen, "binding must not leak into other threads");
    }
}
