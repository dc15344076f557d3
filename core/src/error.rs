//! Error types for todo operations.

use thiserror::Error;

/// Result type alias for todo operations.
pub type Result<T> = std::result::Result<T, TodoError>;

/// Every way a todo operation can fail.
///
/// The HTTP layer maps these onto status codes: validation failures are
/// client errors, missing todos and unknown users are "not found", and
/// repository failures are server errors carrying the underlying message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// A required field was missing or a parameter was malformed.
    #[error("{0}")]
    Validation(String),

    /// The scoped `(id, user)` lookup matched nothing.
    #[error("Todo not found")]
    NotFound,

    /// The identity hint named a user that does not exist.
    #[error("User {0} not found")]
    UserNotFound(String),

    /// The persistence collaborator failed.
    #[error("{0}")]
    Repository(String),
}

impl TodoError {
    /// Build a validation error from any message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a repository error from any displayable failure.
    #[must_use]
    pub fn repository(err: impl std::fmt::Display) -> Self {
        Self::Repository(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_not_found_names_the_user() {
        let err = TodoError::UserNotFound("ghost".to_string());
        assert_eq!(err.to_string(), "User ghost not found");
    }

    #[test]
    fn repository_error_keeps_the_message() {
        let err = TodoError::repository("connection reset");
        assert_eq!(err, TodoError::Repository("connection reset".to_string()));
    }
}
