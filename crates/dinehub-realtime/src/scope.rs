//! The one-slot shared branch scope.

use std::sync::Arc;

use arc_swap::ArcSwap;

use dinehub_entity::branch::BranchScope;

/// Shared, atomically replaced branch scope.
///
/// Every holder sees a store immediately; the push handler reads it on each
/// arrival instead of capturing a copy at subscribe time.
#[derive(Debug, Clone)]
pub struct ScopeCell {
    slot: Arc<ArcSwap<BranchScope>>,
}

impl ScopeCell {
    /// Creates a cell holding `scope`.
    pub fn new(scope: BranchScope) -> Self {
        Self {
            slot: Arc::new(ArcSwap::from_pointee(scope)),
        }
    }

    /// The current scope.
    pub fn load(&self) -> BranchScope {
        **self.slot.load()
    }

    /// Replace the scope, returning the previous one.
    pub fn store(&self, scope: BranchScope) -> BranchScope {
        *self.slot.swap(Arc::new(scope))
    }
}

impl Default for ScopeCell {
    fn default() -> Self {
        Self::new(BranchScope::All)
    }
}
