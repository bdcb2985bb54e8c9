//! Role-based access control: the capability table and its evaluation.

pub mod enforcer;
pub mod policies;

pub use enforcer::{
    can_manage_branches, can_manage_inventory, can_manage_menu, can_manage_orders,
    can_manage_staff, can_manage_users, can_view_billing, can_view_dashboard,
    can_view_kitchen_orders, can_view_orders, has_capability, satisfies, PermissionEnforcer,
    Requirement,
};
pub use policies::{Capability, CapabilityRule, RbacPolicies};
