//! Authentication service — registration, login and token flows delegating
//! to `roster_core::auth`.

use roster_core::auth::jwt::JwtIssuer;
use roster_core::auth::{login as credentials, registration};
use roster_core::auth::store::UserStore;
use roster_core::models::auth::{NewUser, PublicUserView, RegistrationResponse, TokenClaims};

use crate::error::{AppError, AppResult};
use crate::models::{
    LoginRequest, RefreshResponse, RegisterRequest, TokenPairResponse, VerifyResponse,
};

/// Register a new user account and issue its first token pair.
///
/// Fields are forwarded verbatim; the store decides what is acceptable.
pub async fn register(
    store: &dyn UserStore,
    issuer: &JwtIssuer,
    body: RegisterRequest,
) -> AppResult<RegistrationResponse> {
    let request = NewUser {
        username: body.username,
        email: body.email,
        password: body.password,
    };
    Ok(registration::register(store, issuer, request).await?)
}

/// Authenticate with username and password and issue a new token pair.
pub async fn login(
    store: &dyn UserStore,
    issuer: &JwtIssuer,
    body: LoginRequest,
) -> AppResult<TokenPairResponse> {
    let tokens = credentials::login(store, issuer, &body.username, &body.password).await?;
    Ok(TokenPairResponse {
        access: tokens.access,
        refresh: tokens.refresh,
    })
}

/// Exchange a refresh token for a new access token.
pub fn refresh(issuer: &JwtIssuer, refresh_token: &str) -> AppResult<RefreshResponse> {
    let access = issuer.refresh_access(refresh_token)?;
    Ok(RefreshResponse { access })
}

/// Check that a token of either type is well-signed and unexpired.
pub fn verify(issuer: &JwtIssuer, token: &str) -> AppResult<VerifyResponse> {
    issuer.decode_any(token)?;
    Ok(VerifyResponse::default())
}

/// Load the public view of the user an access token was issued to.
pub async fn current_user(
    store: &dyn UserStore,
    claims: &TokenClaims,
) -> AppResult<PublicUserView> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| AppError::Unauthorized("Invalid token subject".into()))?;
    let user = store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(PublicUserView::from(&user))
}
