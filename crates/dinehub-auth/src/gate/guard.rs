//! Route guard: the gate used around whole pages.

use std::sync::Arc;

use dinehub_entity::user::Identity;

use crate::rbac::PermissionEnforcer;

use super::{PermissionGate, ProtectedRegion};

/// Guards a route. Unlike [`PermissionGate::render_or`] there is no
/// fallback: a denied route renders nothing at all.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    gate: PermissionGate,
}

impl RouteGuard {
    /// Creates a guard with the default capability table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard sharing an existing enforcer.
    pub fn with_enforcer(enforcer: Arc<PermissionEnforcer>) -> Self {
        Self {
            gate: PermissionGate::with_enforcer(enforcer),
        }
    }

    /// Produce the page if the identity may enter the route.
    pub fn guard<T>(
        &self,
        identity: Option<&Identity>,
        route: &ProtectedRegion,
        page: impl FnOnce() -> T,
    ) -> Option<T> {
        self.gate.render(identity, route, page)
    }

    /// Whether the identity may enter the route.
    pub fn allows(&self, identity: Option<&Identity>, route: &ProtectedRegion) -> bool {
        self.gate.decide(identity, route).is_render()
    }
}
