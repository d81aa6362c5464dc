//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] hotspots_core::EmailError),

    /// Wrong password for an existing account.
    #[error("Incorrect password")]
    InvalidCredentials,

    /// No account with the given email.
    #[error("Email not found")]
    UserNotFound,

    /// An account with the email already exists.
    #[error("Email already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
