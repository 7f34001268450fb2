//! Convenience result type alias for ClinicSync.

use crate::error::AppError;

/// A specialized `Result` type for ClinicSync operations.
pub type AppResult<T> = Result<T, AppError>;
