//! Role level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use dinehub_core::AppError;

/// Roles known to the restaurant backend, carried on the wire as integers.
///
/// Unlike a privilege ladder these roles are not ordered: apart from the
/// administrator, every role only holds what a capability explicitly grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum RoleLevel {
    /// Full administrator; satisfies every capability check.
    Admin = 1,
    /// Shared tablet login used on the restaurant floor.
    TabletApp = 2,
    /// Branch manager.
    Manager = 3,
    /// Waiter.
    Waiter = 4,
    /// Cashier.
    Cashier = 5,
    /// Kitchen staff.
    Kitchen = 6,
}

impl RoleLevel {
    /// Every role, in wire order.
    pub const ALL: [RoleLevel; 6] = [
        Self::Admin,
        Self::TabletApp,
        Self::Manager,
        Self::Waiter,
        Self::Cashier,
        Self::Kitchen,
    ];

    /// Return the integer carried on the wire.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Check if this role is the administrator.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::TabletApp => "tablet_app",
            Self::Manager => "manager",
            Self::Waiter => "waiter",
            Self::Cashier => "cashier",
            Self::Kitchen => "kitchen",
        }
    }
}

impl TryFrom<u8> for RoleLevel {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|role| role.level() == value)
            .ok_or_else(|| AppError::validation(format!("Unknown role level: {value}")))
    }
}

impl From<RoleLevel> for u8 {
    fn from(role: RoleLevel) -> u8 {
        role.level()
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(level) = s.parse::<u8>() {
            return Self::try_from(level);
        }
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "tablet_app" | "tablet" => Ok(Self::TabletApp),
            "manager" => Ok(Self::Manager),
            "waiter" => Ok(Self::Waiter),
            "cashier" => Ok(Self::Cashier),
            "kitchen" => Ok(Self::Kitchen),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, tablet_app, manager, waiter, cashier, kitchen"
            ))),
        }
    }
}
