//! JWT token issuance and verification.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};
use uuid::Uuid;

use super::{TokenError, TokenIssuanceError};
use crate::models::auth::{TokenClaims, TokenPair, TokenType};

/// Default access token lifetime: 5 minutes.
pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 5 * 60;

/// Default refresh token lifetime: 1 day.
pub const REFRESH_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Upper bound accepted for either lifetime: 10 years.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Mints a token pair bound to a user identity.
pub trait TokenIssuer: Send + Sync {
    fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, TokenIssuanceError>;
}

/// How long each token type stays valid after issuance.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS),
            refresh: Duration::seconds(REFRESH_TOKEN_LIFETIME_SECS),
        }
    }
}

/// HS256 token issuer backed by a shared secret.
#[derive(Clone)]
pub struct JwtIssuer {
    secret: Vec<u8>,
    lifetimes: TokenLifetimes,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("secret", &"<redacted>")
            .field("lifetimes", &self.lifetimes)
            .finish()
    }
}

impl JwtIssuer {
    /// Creates an issuer. An empty secret is accepted here and reported as
    /// [`TokenIssuanceError::MissingKey`] on first use.
    pub fn new(secret: impl Into<Vec<u8>>, lifetimes: TokenLifetimes) -> Self {
        Self {
            secret: secret.into(),
            lifetimes,
        }
    }

    fn encode_token(
        &self,
        user_id: Uuid,
        token_type: TokenType,
    ) -> Result<String, TokenIssuanceError> {
        if self.secret.is_empty() {
            return Err(TokenIssuanceError::MissingKey);
        }

        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.lifetimes.access,
            TokenType::Refresh => self.lifetimes.refresh,
        };
        let exp = now.checked_add_signed(lifetime).ok_or_else(|| {
            TokenIssuanceError::Signing(format!("{token_type} token lifetime out of range"))
        })?;
        let claims = TokenClaims {
            token_type,
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| TokenIssuanceError::Signing(format!("jwt encode: {e}")))
    }

    /// Verify a token's signature, expiry and type, returning its claims.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<TokenClaims, TokenError> {
        let claims = self.decode_any(token)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongType(expected));
        }
        Ok(claims)
    }

    /// Verify a token of either type.
    pub fn decode_any(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenIssuanceError::MissingKey.into());
        }

        let key = DecodingKey::from_secret(&self.secret);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        decode::<TokenClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(error = %e, "rejected token");
                TokenError::Invalid(e.to_string())
            })
    }

    /// Mint a fresh access token from a valid refresh token.
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.verify(refresh_token, TokenType::Refresh)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| TokenError::Invalid("malformed subject".into()))?;
        Ok(self.encode_token(user_id, TokenType::Access)?)
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, TokenIssuanceError> {
        Ok(TokenPair {
            access: self.encode_token(user_id, TokenType::Access)?,
            refresh: self.encode_token(user_id, TokenType::Refresh)?,
        })
    }
}

/// Resolve the JWT secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    if let Ok(secret) = std::env::var("AUTH_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    load_or_create_secret(&jwt_secret_path())
}

/// Read the secret stored at `path`, generating and persisting one if absent.
///
/// A secret that cannot be persisted is still returned, so tokens stay valid
/// for the lifetime of the process.
pub fn load_or_create_secret(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new JWT secret"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not persist JWT secret"),
    }
    secret
}

/// Path to the persisted JWT secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster")
        .join("jwt-secret")
}
