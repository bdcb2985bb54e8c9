//! Newtype wrappers around server-assigned integer identifiers.
//!
//! Using distinct types prevents accidentally passing a `BranchId` where a
//! `NotificationId` is expected. The backend assigns all of these as
//! integers, so each wrapper is `#[serde(transparent)]` over `i64`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create an identifier from a raw value.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the inner value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user.
    UserId
);

define_id!(
    /// Unique identifier for a restaurant branch.
    BranchId
);

define_id!(
    /// Unique identifier for a notification.
    ///
    /// Negative values never come from the server; they are reserved for
    /// records synthesized locally from live pushes that arrived without an id.
    NotificationId
);

impl NotificationId {
    /// Whether this id was synthesized on the client.
    pub fn is_local(self) -> bool {
        self.0 < 0
    }
}
