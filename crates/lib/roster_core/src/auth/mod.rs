//! Authentication and account logic.
//!
//! Provides password hashing, JWT issuance, the user store collaborators and
//! the registration and login flows shared by `roster_api` and `roster_server`.

pub mod jwt;
pub mod login;
pub mod password;
pub mod registration;
pub mod store;

use thiserror::Error;

use crate::models::auth::TokenType;

/// The user store refused to create an account.
#[derive(Debug, Error)]
pub enum UserCreationError {
    #[error("The given username must be set")]
    MissingUsername,

    #[error("A user with username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

/// The token issuer could not sign a token.
#[derive(Debug, Error)]
pub enum TokenIssuanceError {
    #[error("Signing key is not configured")]
    MissingKey,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// A presented token was rejected.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is invalid or expired: {0}")]
    Invalid(String),

    #[error("Token has wrong type, expected {0}")]
    WrongType(TokenType),

    #[error(transparent)]
    Issuance(#[from] TokenIssuanceError),
}

/// Lookup and credential-check failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
