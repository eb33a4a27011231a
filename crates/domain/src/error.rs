//! Domain error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The targeted entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A deletion was refused because active orders still reference the
    /// target. The message is meant to be shown to the caller verbatim.
    #[error("{message}")]
    Conflict { message: String },

    /// The store is unavailable.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Creates a not-found error for the entity with the given key.
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Creates a conflict error carrying a caller-facing message.
    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_key() {
        let err = DomainError::not_found("Product", "FG001");
        assert_eq!(err.to_string(), "Product not found: FG001");
    }

    #[test]
    fn conflict_displays_message_verbatim() {
        let err = DomainError::conflict("cannot delete");
        assert_eq!(err.to_string(), "cannot delete");
    }
}
