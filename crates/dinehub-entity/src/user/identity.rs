//! Authenticated identity model.

use serde::{Deserialize, Serialize};

use dinehub_core::types::id::UserId;

use super::role::RoleLevel;

/// The user behind the current client session.
///
/// Exactly one identity exists per authenticated session. It is created on
/// login or session resumption and dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Server-assigned user id.
    pub id: UserId,
    /// Role level deciding every capability check.
    #[serde(alias = "roleLevel", alias = "role_level")]
    pub role: RoleLevel,
    /// Display name shown in the shell.
    #[serde(default, alias = "displayName", alias = "display_name")]
    pub name: String,
}

impl Identity {
    /// Create a new identity.
    pub fn new(id: UserId, role: RoleLevel, name: impl Into<String>) -> Self {
        Self {
            id,
            role,
            name: name.into(),
        }
    }

    /// Check if this identity is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_fields() {
        let identity: Identity =
            serde_json::from_str(r#"{"id": 9, "roleLevel": 3, "displayName": "Ana"}"#).unwrap();
        assert_eq!(identity, Identity::new(UserId(9), RoleLevel::Manager, "Ana"));
    }

    #[test]
    fn test_missing_name_defaults_empty() {
        let identity: Identity = serde_json::from_str(r#"{"id": 1, "role": 1}"#).unwrap();
        assert!(identity.is_admin());
        assert!(identity.name.is_empty());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(serde_json::from_str::<Identity>(r#"{"id": 1, "role": 42}"#).is_err());
    }
}
