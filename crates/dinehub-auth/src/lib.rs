//! # dinehub-auth
//!
//! Permission evaluation and session identity for the DineHub admin client.
//!
//! ## Modules
//!
//! - `rbac`: the capability table and `satisfies` evaluation
//! - `gate`: render/suppress decisions for protected regions and routes
//! - `session`: the auth service contract, credential store, and session provider

pub mod gate;
pub mod rbac;
pub mod session;

pub use gate::{GateDecision, PermissionGate, ProtectedRegion, RouteGuard};
pub use rbac::{Capability, PermissionEnforcer, RbacPolicies, Requirement, satisfies};
pub use session::{AuthApi, CredentialStore, LoginRequest, SessionProvider, SessionState};
