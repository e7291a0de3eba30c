//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_core::auth::login::LoginError;
use roster_core::auth::registration::RegistrationError;
use roster_core::auth::{AuthError, TokenError, UserCreationError};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m.as_str()),
            AppError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<UserCreationError> for AppError {
    fn from(e: UserCreationError) -> Self {
        let message = e.to_string();
        match e {
            UserCreationError::MissingUsername | UserCreationError::DuplicateUsername(_) => {
                AppError::Validation(message)
            }
            UserCreationError::Hashing(_) | UserCreationError::DbError(_) => {
                AppError::Internal(message)
            }
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::UserCreation(e) => AppError::from(e),
            RegistrationError::TokenIssuance(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(_) | TokenError::WrongType(_) => {
                AppError::Unauthorized("Token is invalid or expired".into())
            }
            TokenError::Issuance(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::DbError(_) | AuthError::Internal(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::Auth(e) => AppError::from(e),
            LoginError::TokenIssuance(e) => AppError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use roster_core::auth::TokenIssuanceError;
    use roster_core::models::auth::TokenType;

    use super::*;

    fn status_of(e: impl Into<AppError>) -> StatusCode {
        e.into().into_response().status()
    }

    #[test]
    fn user_creation_errors_map_to_bad_request() {
        assert_eq!(
            status_of(UserCreationError::DuplicateUsername("alice".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(UserCreationError::MissingUsername),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(UserCreationError::Hashing("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn issuance_errors_map_to_internal() {
        assert_eq!(
            status_of(RegistrationError::TokenIssuance(TokenIssuanceError::MissingKey)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(TokenError::Issuance(TokenIssuanceError::MissingKey)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn login_errors_map_by_cause() {
        assert_eq!(
            status_of(LoginError::Auth(AuthError::CredentialError)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(LoginError::Auth(AuthError::Internal("bcrypt".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(LoginError::TokenIssuance(TokenIssuanceError::MissingKey)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rejected_tokens_map_to_unauthorized() {
        assert_eq!(
            status_of(TokenError::WrongType(TokenType::Refresh)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(TokenError::Invalid("bad".into())),
            StatusCode::UNAUTHORIZED
        );
    }
}
