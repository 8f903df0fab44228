//! Core error types for the investment ledger.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Stored reference data breaks an invariant the ledger relies on,
    /// e.g. two active rate entries for the same group and period.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Whether this error should be reported to the caller as a conflict
    /// (duplicate position, duplicate rate entry, broken uniqueness).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::ConstraintViolation(_)
                | Error::Integrity(_)
                | Error::Database(DatabaseError::UniqueViolation(_))
        )
    }

    /// Whether this error is an integrity failure that must never be
    /// swallowed by the valuation fallback.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity(_))
    }
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
