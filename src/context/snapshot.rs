//! Immutable snapshots of the ambient context.

use std::fmt;

use crate::context::var::{capture_all, Binding};
use crate::context::ContextScope;

/// The frozen values of all context variables bound at capture time.
///
/// Captured on the scheduler thread at the moment a blocking handler is
/// submitted, then moved into the worker thunk and re-applied there via
/// [`ContextSnapshot::enter`]. The snapshot is immutable and `Send`; it can
/// be entered any number of times, on any thread.
#[derive(Clone, Default)]
pub struct ContextSnapshot {
    bindings: Vec<Binding>,
}

impl ContextSnapshot {
    /// Captures the current thread's bindings, in variable-registration order.
    ///
    /// Variables with no binding are not captured: re-applying the snapshot
    /// on a clean worker thread leaves them unset there too.
    pub fn capture() -> Self {
        Self {
            bindings: capture_all(),
        }
    }

    /// Re-establishes the captured bindings as one scope.
    pub fn enter(&self) -> ContextScope {
        ContextScope::enter(self.bindings.iter().cloned())
    }

    /// Number of captured bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing was bound at capture time.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for ContextSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextSnapshot")
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::{ContextScope, ContextVar};

    #[test]
    fn test_empty_snapshot_on_clean_thread() {
        // Other tests may have bound vars on their own threads; run on a
        // fresh one to observe a clean ambient state.
        std::thread::spawn(|| {
            let snapshot = ContextSnapshot::capture();
            assert!(snapshot.is_empty());
            let scope = snapshot.enter();
            assert!(scope.is_empty());
        })
        .join()
        .expect("thread panicked");
    }

    #[test]
    fn test_snapshot_carries_values_to_another_thread() {
        let var: ContextVar<String> = ContextVar::new("snapshot-carry");
        let _scope = ContextScope::enter([var.bind(Arc::new("submitted".to_string()))]);
        let snapshot = ContextSnapshot::capture();

        let observed = std::thread::spawn(move || {
            assert!(var.get().is_none(), "worker starts clean");
            let _applied = snapshot.enter();
            var.get().map(|value| value.as_str().to_string())
        })
        .join()
        .expect("thread panicked");

        assert_eq!(observed.as_deref(), Some("submitted"));
        assert_eq!(var.get().as_deref().map(String::as_str), Some("submitted"));
    }

    #[test]
    fn test_snapshot_is_fixed_at_capture_time() {
        let var: ContextVar<u32> = ContextVar::new("snapshot-fixed");
        let outer = ContextScope::enter([var.bind(Arc::new(1))]);
        let snapshot = ContextSnapshot::capture();

        let inner = ContextScope::enter([var.bind(Arc::new(2))]);
        {
            let _applied = snapshot.enter();
            assert_eq!(
                var.get().as_deref(),
                Some(&1),
                "snapshot must observe submission-time values"
            );
        }
        assert_eq!(var.get().as_deref(), Some(&2));
        drop(inner);
        drop(outer);
    }
}
