//! Convenience result type alias for BoxSync.

use crate::error::AppError;

/// A specialized `Result` type for BoxSync operations.
pub type AppResult<T> = Result<T, AppError>;
