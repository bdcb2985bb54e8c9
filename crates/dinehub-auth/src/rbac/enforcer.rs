//! Permission evaluation: does a role level satisfy a requirement?

use std::borrow::Cow;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use dinehub_core::error::AppError;
use dinehub_entity::user::RoleLevel;

use super::policies::{Capability, RbacPolicies};

/// What a protected region asks of the current role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Exactly this role.
    Role(RoleLevel),
    /// Any of these roles.
    AnyOf(Vec<RoleLevel>),
    /// Whatever roles the capability table grants.
    Capability(Capability),
}

impl From<RoleLevel> for Requirement {
    fn from(role: RoleLevel) -> Self {
        Self::Role(role)
    }
}

impl From<&[RoleLevel]> for Requirement {
    fn from(roles: &[RoleLevel]) -> Self {
        Self::AnyOf(roles.to_vec())
    }
}

impl From<Vec<RoleLevel>> for Requirement {
    fn from(roles: Vec<RoleLevel>) -> Self {
        Self::AnyOf(roles)
    }
}

impl From<Capability> for Requirement {
    fn from(capability: Capability) -> Self {
        Self::Capability(capability)
    }
}

/// Evaluates requirements against role levels.
#[derive(Debug, Clone)]
pub struct PermissionEnforcer {
    /// The policy configuration.
    policies: RbacPolicies,
}

impl PermissionEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Whether `role` satisfies `requirement`.
    ///
    /// No role never satisfies anything. The administrator satisfies
    /// everything, including an empty role set. Any other role must be a
    /// member of the resolved set.
    pub fn satisfies(&self, role: Option<RoleLevel>, requirement: &Requirement) -> bool {
        let Some(role) = role else {
            return false;
        };
        if role.is_admin() {
            return true;
        }
        self.allowed_roles(requirement).contains(&role)
    }

    /// Whether `role` holds `capability`.
    pub fn has_capability(&self, role: Option<RoleLevel>, capability: Capability) -> bool {
        self.satisfies(role, &Requirement::Capability(capability))
    }

    /// Mutation guard: `Ok(())` if allowed, `Err(Authorization)` otherwise.
    ///
    /// Callers turn the error into silent suppression, never a message.
    pub fn require(&self, role: Option<RoleLevel>, capability: Capability) -> Result<(), AppError> {
        if self.has_capability(role, capability) {
            return Ok(());
        }
        match role {
            None => Err(AppError::authentication(format!(
                "Capability '{capability}' requires an authenticated identity"
            ))),
            Some(role) => Err(AppError::authorization(format!(
                "Role '{role}' does not hold '{capability}'"
            ))),
        }
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }

    fn allowed_roles<'a>(&self, requirement: &'a Requirement) -> Cow<'a, [RoleLevel]> {
        match requirement {
            Requirement::Role(role) => Cow::Owned(vec![*role]),
            Requirement::AnyOf(roles) => Cow::Borrowed(roles.as_slice()),
            Requirement::Capability(cap) => {
                Cow::Owned(self.policies.rule_for(*cap).allowed_roles())
            }
        }
    }
}

impl Default for PermissionEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_ENFORCER: LazyLock<PermissionEnforcer> = LazyLock::new(PermissionEnforcer::new);

/// Evaluates `requirement` against the built-in capability table.
pub fn satisfies(role: Option<RoleLevel>, requirement: &Requirement) -> bool {
    DEFAULT_ENFORCER.satisfies(role, requirement)
}

/// Whether `role` holds `capability` under the built-in table.
pub fn has_capability(role: Option<RoleLevel>, capability: Capability) -> bool {
    DEFAULT_ENFORCER.has_capability(role, capability)
}

// Named predicates consulted by pages, menu entries, and actions.

/// Whether `role` may create and edit branches.
pub fn can_manage_branches(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ManageBranches)
}

/// Whether `role` may manage user accounts.
pub fn can_manage_users(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ManageUsers)
}

/// Whether `role` may edit the menu.
pub fn can_manage_menu(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ManageMenu)
}

/// Whether `role` may adjust inventory.
pub fn can_manage_inventory(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ManageInventory)
}

/// Whether `role` may manage staff records and shifts.
pub fn can_manage_staff(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ManageStaff)
}

/// Whether `role` may see the order list.
pub fn can_view_orders(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ViewOrders)
}

/// Whether `role` may create and update orders.
pub fn can_manage_orders(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ManageOrders)
}

/// Whether `role` may see the kitchen order queue.
pub fn can_view_kitchen_orders(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ViewKitchenOrders)
}

/// Whether `role` may see bills and payments.
pub fn can_view_billing(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ViewBilling)
}

/// Whether `role` may see the dashboard.
pub fn can_view_dashboard(role: Option<RoleLevel>) -> bool {
    has_capability(role, Capability::ViewDashboard)
}
