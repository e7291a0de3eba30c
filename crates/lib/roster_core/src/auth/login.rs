//! Credential login: exchange a username and password for a fresh token pair.

use thiserror::Error;
use tracing::{debug, info};

use super::jwt::TokenIssuer;
use super::password::verify_password_blocking;
use super::store::UserStore;
use super::{AuthError, TokenIssuanceError};
use crate::models::auth::TokenPair;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    TokenIssuance(#[from] TokenIssuanceError),
}

/// Authenticate `username` / `password` against the store and issue tokens.
///
/// Unknown usernames and wrong passwords both yield
/// [`AuthError::CredentialError`].
pub async fn login(
    store: &dyn UserStore,
    issuer: &dyn TokenIssuer,
    username: &str,
    password: &str,
) -> Result<TokenPair, LoginError> {
    let Some(user) = store.find_by_username(username).await? else {
        debug!(%username, "login for unknown user");
        return Err(AuthError::CredentialError.into());
    };

    if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
        debug!(user_id = %user.id, "login with wrong password");
        return Err(AuthError::CredentialError.into());
    }

    let tokens = issuer.issue_pair(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(tokens)
}
