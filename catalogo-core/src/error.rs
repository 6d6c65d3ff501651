//! Error types for catalog operations

use thiserror::Error;

/// Validation errors raised before any request leaves the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The {entity} name is required")]
    EmptyDescripcion { entity: &'static str },
}

/// Trim a description and reject it when nothing is left.
pub fn validate_descripcion(entity: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescripcion { entity });
    }
    Ok(trimmed.to_string())
}
