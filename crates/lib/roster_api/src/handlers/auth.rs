//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, PublicUserView, RefreshRequest, RefreshResponse, RegisterRequest,
    RegistrationResponse, TokenPairResponse, VerifyRequest, VerifyResponse,
};
use crate::services::auth;

/// `POST /auth/register` — create a new user account and issue its tokens.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<RegistrationResponse>> {
    let resp = auth::register(state.store.as_ref(), &state.issuer, body).await?;
    Ok(Json(resp))
}

/// `POST /auth/token` — log in with username and password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let resp = auth::login(state.store.as_ref(), &state.issuer, body).await?;
    Ok(Json(resp))
}

/// `POST /auth/token/refresh` — exchange a refresh token for a new access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let resp = auth::refresh(&state.issuer, &body.refresh)?;
    Ok(Json(resp))
}

/// `POST /auth/token/verify` — check a token without acting on it.
pub async fn verify_handler(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> AppResult<Json<VerifyResponse>> {
    let resp = auth::verify(&state.issuer, &body.token)?;
    Ok(Json(resp))
}

/// `GET /auth/me` — the authenticated user. Requires authentication.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
) -> AppResult<Json<PublicUserView>> {
    let resp = auth::current_user(state.store.as_ref(), &claims).await?;
    Ok(Json(resp))
}
