//! Branch entities and the branch scope value.

pub mod model;
pub mod scope;

pub use model::{BranchOption, BranchOptions};
pub use scope::BranchScope;
