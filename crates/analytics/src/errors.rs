//! Core error types for the analytics crate.
//!
//! The computations in this crate never fail on degenerate input; errors only
//! originate from the persistence collaborator used by edit sessions and from
//! parsing identifiers that come back from the grid.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analytics crate.
///
/// Storage-specific errors are wrapped in string form by the persistence
/// collaborator so this type stays storage-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Storage-agnostic error type for save/delete operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
