//! Request and response bodies.

use serde::{Deserialize, Serialize};

pub use roster_core::models::auth::{PublicUserView, RegistrationResponse};

/// `POST /auth/register` body. All fields are required.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/token` body.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/token` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// `POST /auth/token/refresh` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// `POST /auth/token/refresh` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// `POST /auth/token/verify` body.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// `POST /auth/token/verify` response; empty on success.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyResponse {}

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body for failures raised by the services and auth middleware.
///
/// Extractor rejections (malformed JSON, wrong content type) keep axum's
/// plain-text bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
