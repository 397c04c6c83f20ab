//! RAII guard for a context scope.

use super::ContextStore;
use std::ops::{Deref, DerefMut};

/// Guard for a nested [`ContextStore`] scope.
///
/// Dereferences to the store, so reads and writes go through the guard while
/// the scope is open. When dropped (normal return, early return, `?`, or
/// unwinding) the scope and everything written into it is discarded.
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    store: &'a mut ContextStore,

    /// Scope depth to restore on drop.
    outer_depth: usize,
}

impl<'a> ScopeGuard<'a> {
    pub(super) fn new(store: &'a mut ContextStore, outer_depth: usize) -> Self {
        Self { store, outer_depth }
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = ContextStore;

    fn deref(&self) -> &ContextStore {
        self.store
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut ContextStore {
        self.store
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.store.truncate_scopes(self.outer_depth);
    }
}
