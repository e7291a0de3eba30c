//! Roster API server binary.
//!
//! Serves the registration and token endpoints over HTTP, backed by
//! PostgreSQL or, with `--in-memory`, by a throwaway in-process store.

use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use roster_api::config::ApiConfig;
use roster_core::auth::jwt::{
    ACCESS_TOKEN_LIFETIME_SECS, MAX_TOKEN_LIFETIME_SECS, REFRESH_TOKEN_LIFETIME_SECS,
    TokenLifetimes, resolve_jwt_secret,
};
use roster_core::auth::store::{MemoryUserStore, PgUserStore, UserStore};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "roster_server", about = "Roster account registration server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "ROSTER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "ROSTER_PORT", default_value_t = 3100)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/roster"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep accounts in memory instead of PostgreSQL. Nothing survives a restart.
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Access token lifetime in seconds (1 to ten years).
    #[arg(
        long,
        env = "ACCESS_TOKEN_LIFETIME_SECS",
        default_value_t = ACCESS_TOKEN_LIFETIME_SECS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_LIFETIME_SECS)
    )]
    access_token_lifetime_secs: i64,

    /// Refresh token lifetime in seconds (1 to ten years).
    #[arg(
        long,
        env = "REFRESH_TOKEN_LIFETIME_SECS",
        default_value_t = REFRESH_TOKEN_LIFETIME_SECS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_LIFETIME_SECS)
    )]
    refresh_token_lifetime_secs: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,roster_api=debug,roster_core=debug")),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        pg_connection_url: (!args.in_memory).then(|| args.database_url.clone()),
        jwt_secret: resolve_jwt_secret(),
        token_lifetimes: TokenLifetimes {
            access: Duration::seconds(args.access_token_lifetime_secs),
            refresh: Duration::seconds(args.refresh_token_lifetime_secs),
        },
    };

    info!(bind_addr = %config.bind_addr, in_memory = args.in_memory, "starting roster_server");

    let store: Arc<dyn UserStore> = match &config.pg_connection_url {
        Some(url) => {
            info!(
                max_connections = args.max_connections,
                "configuring connection pool"
            );
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(url)
                .await?;

            info!("running database migrations");
            roster_api::migrate(&pool).await?;

            Arc::new(PgUserStore::new(pool))
        }
        None => {
            warn!("using in-memory user store; accounts are lost on exit");
            Arc::new(MemoryUserStore::new())
        }
    };

    let state = roster_api::AppState::new(store, config.clone());
    let app = roster_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupt received, shutting down");
                    shutdown.cancel();
                }
                Err(e) => warn!(error = %e, "cannot listen for interrupt signal"),
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}
