//! Integration tests for permission evaluation as seen through gates,
//! route guards, and mutation guards.

use dinehub_auth::gate::{GateDecision, PermissionGate, ProtectedRegion, RouteGuard};
use dinehub_auth::rbac::{
    Capability, PermissionEnforcer, Requirement, can_view_dashboard, can_view_orders, satisfies,
};
use dinehub_core::error::ErrorKind;
use dinehub_core::types::id::UserId;
use dinehub_entity::user::{Identity, RoleLevel};

fn identity(role: RoleLevel) -> Identity {
    Identity::new(UserId(role.level() as i64), role, role.as_str())
}

#[test]
fn test_admin_satisfies_every_requirement() {
    let empty: Vec<RoleLevel> = Vec::new();
    assert!(satisfies(Some(RoleLevel::Admin), &Requirement::from(empty)));
    for capability in Capability::ALL {
        assert!(satisfies(
            Some(RoleLevel::Admin),
            &Requirement::from(capability)
        ));
    }
}

#[test]
fn test_membership_decides_for_other_roles() {
    let set = vec![RoleLevel::Waiter, RoleLevel::Cashier];
    for role in RoleLevel::ALL.into_iter().filter(|r| !r.is_admin()) {
        assert_eq!(
            satisfies(Some(role), &Requirement::from(set.clone())),
            set.contains(&role),
            "{role}"
        );
    }
    assert!(!satisfies(None, &Requirement::from(set)));
}

#[test]
fn test_deny_list_capabilities() {
    for role in RoleLevel::ALL {
        let expected = role != RoleLevel::TabletApp;
        assert_eq!(can_view_orders(Some(role)), expected, "{role}");
        assert_eq!(can_view_dashboard(Some(role)), expected, "{role}");
    }
    assert!(!can_view_orders(None));
    assert!(!can_view_dashboard(None));
}

#[test]
fn test_gate_matrix() {
    let gate = PermissionGate::new();
    let kitchen = identity(RoleLevel::Kitchen);
    let billing = ProtectedRegion::requiring(Capability::ViewBilling);

    assert_eq!(
        gate.decide(None, &ProtectedRegion::authenticated()),
        GateDecision::Suppress
    );
    assert_eq!(
        gate.decide(None, &ProtectedRegion::public()),
        GateDecision::Render
    );
    assert_eq!(gate.decide(None, &billing), GateDecision::Suppress);
    assert_eq!(
        gate.decide(Some(&kitchen), &ProtectedRegion::authenticated()),
        GateDecision::Render
    );
    assert_eq!(gate.decide(Some(&kitchen), &billing), GateDecision::Suppress);
    assert_eq!(
        gate.render_or(Some(&kitchen), &billing, || "billing", || "hidden"),
        "hidden"
    );
}

#[test]
fn test_route_guard_renders_nothing_when_denied() {
    let guard = RouteGuard::new();
    let route = ProtectedRegion::requiring(Capability::ManageMenu);

    assert_eq!(
        guard.guard(Some(&identity(RoleLevel::Manager)), &route, || "menu"),
        Some("menu")
    );
    assert_eq!(
        guard.guard(Some(&identity(RoleLevel::Waiter)), &route, || "menu"),
        None
    );
    assert_eq!(guard.guard(None, &route, || "menu"), None);
}

#[test]
fn test_mutation_guard_errors() {
    let enforcer = PermissionEnforcer::new();

    assert!(
        enforcer
            .require(Some(RoleLevel::Cashier), Capability::ManageOrders)
            .is_ok()
    );
    let forbidden = enforcer
        .require(Some(RoleLevel::Cashier), Capability::ManageStaff)
        .unwrap_err();
    assert_eq!(forbidden.kind, ErrorKind::Authorization);
    let anonymous = enforcer
        .require(None, Capability::ManageStaff)
        .unwrap_err();
    assert_eq!(anonymous.kind, ErrorKind::Authentication);
}
