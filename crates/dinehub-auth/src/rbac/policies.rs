//! Capability-to-role mapping definitions.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use dinehub_entity::user::RoleLevel;

/// A dashboard capability guarding a page, a menu entry, or a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, edit, and delete branches.
    ManageBranches,
    /// Manage dashboard user accounts.
    ManageUsers,
    /// Edit menus, categories, and items.
    ManageMenu,
    /// Edit stock and ingredients.
    ManageInventory,
    /// Manage staff records and shifts.
    ManageStaff,
    /// See the order list.
    ViewOrders,
    /// Create, update, and cancel orders.
    ManageOrders,
    /// See the kitchen order board.
    ViewKitchenOrders,
    /// See bills and payments.
    ViewBilling,
    /// See the dashboard overview.
    ViewDashboard,
}

impl Capability {
    /// Every capability.
    pub const ALL: [Capability; 10] = [
        Self::ManageBranches,
        Self::ManageUsers,
        Self::ManageMenu,
        Self::ManageInventory,
        Self::ManageStaff,
        Self::ViewOrders,
        Self::ManageOrders,
        Self::ViewKitchenOrders,
        Self::ViewBilling,
        Self::ViewDashboard,
    ];

    /// Return the capability as a kebab-case tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageBranches => "manage-branches",
            Self::ManageUsers => "manage-users",
            Self::ManageMenu => "manage-menu",
            Self::ManageInventory => "manage-inventory",
            Self::ManageStaff => "manage-staff",
            Self::ViewOrders => "view-orders",
            Self::ManageOrders => "manage-orders",
            Self::ViewKitchenOrders => "view-kitchen-orders",
            Self::ViewBilling => "view-billing",
            Self::ViewDashboard => "view-dashboard",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = dinehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|cap| cap.as_str() == normalized)
            .ok_or_else(|| dinehub_core::AppError::validation(format!("Unknown capability: '{s}'")))
    }
}

/// How a capability selects the non-admin roles that hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityRule {
    /// Only the listed roles.
    Allow(&'static [RoleLevel]),
    /// Every role except the listed ones.
    Deny(&'static [RoleLevel]),
}

impl CapabilityRule {
    /// Expand the rule into the explicit set of roles that hold it.
    pub fn allowed_roles(self) -> Vec<RoleLevel> {
        match self {
            Self::Allow(roles) => roles.to_vec(),
            Self::Deny(roles) => RoleLevel::ALL
                .into_iter()
                .filter(|role| !roles.contains(role))
                .collect(),
        }
    }
}

/// The built-in capability table.
///
/// Order and dashboard visibility are deny-lists: everyone except the shared
/// tablet login. Everything else is an allow-list.
pub const DEFAULT_RULES: [(Capability, CapabilityRule); 10] = [
    (Capability::ManageBranches, CapabilityRule::Allow(&[])),
    (Capability::ManageUsers, CapabilityRule::Allow(&[RoleLevel::Manager])),
    (Capability::ManageMenu, CapabilityRule::Allow(&[RoleLevel::Manager])),
    (
        Capability::ManageInventory,
        CapabilityRule::Allow(&[RoleLevel::Manager, RoleLevel::Kitchen]),
    ),
    (Capability::ManageStaff, CapabilityRule::Allow(&[RoleLevel::Manager])),
    (Capability::ViewOrders, CapabilityRule::Deny(&[RoleLevel::TabletApp])),
    (
        Capability::ManageOrders,
        CapabilityRule::Allow(&[RoleLevel::Manager, RoleLevel::Waiter, RoleLevel::Cashier]),
    ),
    (
        Capability::ViewKitchenOrders,
        CapabilityRule::Allow(&[RoleLevel::Manager, RoleLevel::Waiter, RoleLevel::Kitchen]),
    ),
    (
        Capability::ViewBilling,
        CapabilityRule::Allow(&[RoleLevel::Manager, RoleLevel::Cashier]),
    ),
    (Capability::ViewDashboard, CapabilityRule::Deny(&[RoleLevel::TabletApp])),
];

/// Defines the mapping from each capability to the rule granting it.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Capability → rule.
    rules: HashMap<Capability, CapabilityRule>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.into_iter().collect(),
        }
    }

    /// Replaces the rule for one capability.
    pub fn with_rule(mut self, capability: Capability, rule: CapabilityRule) -> Self {
        self.rules.insert(capability, rule);
        self
    }

    /// Returns the rule for a capability. Unmapped capabilities are admin-only.
    pub fn rule_for(&self, capability: Capability) -> CapabilityRule {
        self.rules
            .get(&capability)
            .copied()
            .unwrap_or(CapabilityRule::Allow(&[]))
    }

    /// Returns every capability the given role holds, admin included.
    pub fn capabilities_for_role(&self, role: RoleLevel) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|cap| role.is_admin() || self.rule_for(*cap).allowed_roles().contains(&role))
            .collect()
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
