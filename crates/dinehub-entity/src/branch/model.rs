//! Branch option models returned by the branch service.

use serde::{Deserialize, Serialize};

use dinehub_core::types::id::BranchId;

/// A selectable branch in the shell's branch switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOption {
    /// Branch id.
    pub id: BranchId,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// All selectable branches plus the one the server considers current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOptions {
    /// Selectable branches.
    #[serde(default)]
    pub options: Vec<BranchOption>,
    /// Server-side current branch, if one is set.
    #[serde(default)]
    pub current: Option<BranchId>,
}
