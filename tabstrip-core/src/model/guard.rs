//! Per-model reentrancy guard

use std::cell::Cell;

/// Rejects a mutation started while another one on the same model is still
/// in flight.
#[derive(Debug, Default)]
pub(crate) struct ReentrancyGuard {
    current: Cell<Option<&'static str>>,
}

impl ReentrancyGuard {
    /// Marks `operation` as in flight until the returned scope drops.
    ///
    /// # Panics
    ///
    /// Panics if another operation is already in flight.
    pub(crate) fn enter(&self, operation: &'static str) -> GuardScope<'_> {
        if let Some(current) = self.current.get() {
            tracing::error!(operation, current, "re-entrant tab strip mutation");
            panic!("re-entrant tab strip mutation: {operation} called during {current}");
        }
        self.current.set(Some(operation));
        GuardScope { guard: self }
    }

    /// Returns true while an operation is in flight.
    pub(crate) fn is_held(&self) -> bool {
        self.current.get().is_some()
    }
}

/// Releases the guard on drop, including during unwinding.
#[derive(Debug)]
pub(crate) struct GuardScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.current.set(None);
    }
}
