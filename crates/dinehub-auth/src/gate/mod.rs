//! Render/suppress decisions for protected regions.
//!
//! A gate never produces an error: denial is silent absence (or an explicit
//! fallback), so restricted features do not reveal that they exist. Gates
//! hold no state and must be re-evaluated whenever the identity or the
//! region's requirement changes.

pub mod guard;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dinehub_entity::user::Identity;

use crate::rbac::{PermissionEnforcer, Requirement};

pub use guard::RouteGuard;

/// A page, menu entry, or action that may be hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedRegion {
    /// Whether an identity is needed at all.
    pub require_auth: bool,
    /// Role requirement; `None` means any authenticated identity.
    pub requirement: Option<Requirement>,
}

impl ProtectedRegion {
    /// A region any authenticated identity may see.
    pub fn authenticated() -> Self {
        Self {
            require_auth: true,
            requirement: None,
        }
    }

    /// A region visible without logging in.
    pub fn public() -> Self {
        Self {
            require_auth: false,
            requirement: None,
        }
    }

    /// A region gated by a role requirement.
    pub fn requiring(requirement: impl Into<Requirement>) -> Self {
        Self {
            require_auth: true,
            requirement: Some(requirement.into()),
        }
    }
}

impl Default for ProtectedRegion {
    fn default() -> Self {
        Self::authenticated()
    }
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the region.
    Render,
    /// Show nothing (or the fallback).
    Suppress,
}

impl GateDecision {
    /// Whether the region is shown.
    pub fn is_render(self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Decides visibility of protected regions for an identity.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    enforcer: Arc<PermissionEnforcer>,
}

impl PermissionGate {
    /// Creates a gate with the default capability table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gate sharing an existing enforcer.
    pub fn with_enforcer(enforcer: Arc<PermissionEnforcer>) -> Self {
        Self { enforcer }
    }

    /// Decide whether `region` is shown to `identity`.
    pub fn decide(&self, identity: Option<&Identity>, region: &ProtectedRegion) -> GateDecision {
        let allowed = match (identity, &region.requirement) {
            (None, None) => !region.require_auth,
            (Some(_), None) => true,
            (identity, Some(requirement)) => self
                .enforcer
                .satisfies(identity.map(|i| i.role), requirement),
        };
        if allowed {
            GateDecision::Render
        } else {
            tracing::trace!(
                user_id = ?identity.map(|i| i.id),
                requirement = ?region.requirement,
                "Protected region suppressed"
            );
            GateDecision::Suppress
        }
    }

    /// Produce the content if allowed, otherwise nothing.
    pub fn render<T>(
        &self,
        identity: Option<&Identity>,
        region: &ProtectedRegion,
        content: impl FnOnce() -> T,
    ) -> Option<T> {
        self.decide(identity, region).is_render().then(content)
    }

    /// Produce the content if allowed, otherwise the fallback.
    pub fn render_or<T>(
        &self,
        identity: Option<&Identity>,
        region: &ProtectedRegion,
        content: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match self.decide(identity, region) {
            GateDecision::Render => content(),
            GateDecision::Suppress => fallback(),
        }
    }

    /// The enforcer this gate consults.
    pub fn enforcer(&self) -> &PermissionEnforcer {
        &self.enforcer
    }
}
