//! API server configuration.

use roster_core::auth::jwt::TokenLifetimes;

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL; `None` selects the in-memory store.
    pub pg_connection_url: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access/refresh token lifetimes.
    pub token_lifetimes: TokenLifetimes,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("pg_connection_url", &self.pg_connection_url)
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetimes", &self.token_lifetimes)
            .finish()
    }
}
