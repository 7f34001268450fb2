//! Key validation for the session register.
//!
//! Keys double as file names in the local provider, so they are limited to
//! a conservative character set everywhere.

use clinicsync_core::error::AppError;
use clinicsync_core::result::AppResult;

/// Longest key accepted by any provider.
pub const MAX_KEY_LEN: usize = 128;

/// Check that a key is non-empty and only uses `A-Z a-z 0-9 _ - .`.
pub fn validate(key: &str) -> AppResult<()> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(AppError::validation(format!(
            "Store key must be 1..={MAX_KEY_LEN} characters, got {}",
            key.len()
        )));
    }
    if key.starts_with('.') {
        return Err(AppError::validation(format!(
            "Store key must not start with '.': {key}"
        )));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(AppError::validation(format!(
            "Store key contains invalid character {bad:?}: {key}"
        )));
    }
    Ok(())
}
