//! Convenience result type alias for DineHub.

use crate::error::AppError;

/// A specialized `Result` type for DineHub operations.
pub type AppResult<T> = Result<T, AppError>;
