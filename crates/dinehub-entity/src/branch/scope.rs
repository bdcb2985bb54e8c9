//! Branch scope filtering the notification feed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use dinehub_core::types::id::BranchId;
use dinehub_core::AppError;

/// Which branch the dashboard is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchScope {
    /// No filter.
    #[default]
    All,
    /// Only notifications tagged with this branch.
    Branch(BranchId),
}

impl BranchScope {
    /// Whether a notification tagged with `branch` is visible in this scope.
    ///
    /// Global notifications (no branch) are only visible under `All`.
    pub fn admits(self, branch: Option<BranchId>) -> bool {
        match self {
            Self::All => true,
            Self::Branch(id) => branch == Some(id),
        }
    }

    /// The branch filter to send to the backend, if any.
    pub fn branch_id(self) -> Option<BranchId> {
        match self {
            Self::All => None,
            Self::Branch(id) => Some(id),
        }
    }
}

impl From<Option<BranchId>> for BranchScope {
    fn from(branch: Option<BranchId>) -> Self {
        branch.map_or(Self::All, Self::Branch)
    }
}

impl fmt::Display for BranchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Branch(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for BranchScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<BranchId>()
            .map(Self::Branch)
            .map_err(|_| AppError::validation(format!("Invalid branch scope: '{s}'")))
    }
}
