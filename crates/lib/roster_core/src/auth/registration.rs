//! Account registration: create a user, then issue its first token pair.

use thiserror::Error;
use tracing::info;

use super::jwt::TokenIssuer;
use super::store::UserStore;
use super::{TokenIssuanceError, UserCreationError};
use crate::models::auth::{NewUser, PublicUserView, RegistrationResponse};

/// Either collaborator failed; nothing was persisted.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    UserCreation(#[from] UserCreationError),

    #[error(transparent)]
    TokenIssuance(#[from] TokenIssuanceError),
}

/// Register a new account and issue its tokens.
///
/// User creation and token issuance share one unit of work: the account is
/// committed only once both tokens are signed, so a signing failure leaves no
/// user behind. Collaborator errors are returned unchanged.
pub async fn register(
    store: &dyn UserStore,
    issuer: &dyn TokenIssuer,
    request: NewUser,
) -> Result<RegistrationResponse, RegistrationError> {
    let mut tx = store.begin().await?;
    let user = tx.create_user(request).await?;
    let tokens = issuer.issue_pair(user.id)?;
    tx.commit().await?;

    info!(user_id = %user.id, username = %user.username, "registered user");

    Ok(RegistrationResponse {
        user: PublicUserView::from(&user),
        access: tokens.access,
        refresh: tokens.refresh,
    })
}
