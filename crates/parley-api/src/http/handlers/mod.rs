//! HTTP request handlers for the REST API.

pub mod chat;
pub mod room;
pub mod stats;

use crate::http::error::AppError;

/// Reject blank identifiers with a 400.
pub(crate) fn require_field(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}
