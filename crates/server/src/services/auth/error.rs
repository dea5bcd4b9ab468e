//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] commande_core::UsernameError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The credential file could not be read or written.
    #[error("credential source error: {0}")]
    Source(#[source] StoreError),

    /// Legacy credential file could not be read.
    #[error("legacy credential file {path}: {message}")]
    Legacy { path: String, message: String },

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(username) => Self::UserAlreadyExists(username),
            other => Self::Source(other),
        }
    }
}
