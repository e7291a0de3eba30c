//! # roster_api
//!
//! HTTP API library for Roster.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use roster_core::auth::jwt::JwtIssuer;
use roster_core::auth::store::UserStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User store collaborator.
    pub store: Arc<dyn UserStore>,
    /// Token issuer collaborator.
    pub issuer: Arc<JwtIssuer>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Build state with a [`JwtIssuer`] derived from `config`.
    pub fn new(store: Arc<dyn UserStore>, config: ApiConfig) -> Self {
        let issuer = JwtIssuer::new(config.jwt_secret.clone(), config.token_lifetimes);
        Self {
            store,
            issuer: Arc::new(issuer),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `roster_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    roster_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_API_HEALTH, get(health::health))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_TOKEN, post(auth::login_handler))
        .route(routes::POST_AUTH_TOKEN_REFRESH, post(auth::refresh_handler))
        .route(routes::POST_AUTH_TOKEN_VERIFY, post(auth::verify_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
