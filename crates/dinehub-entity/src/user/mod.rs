//! User identity entities.

pub mod identity;
pub mod role;

pub use identity::Identity;
pub use role::RoleLevel;
