/// Auth Service - Main entry point
///
/// Starts the REST API with:
/// - PostgreSQL connection pool (migrations applied at startup), or in-memory
///   tables when `DATABASE_URL` is unset
/// - HS512 access token signer
/// - Background sweep of expired refresh tokens
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use auth_service::{
    build_router,
    config::{DatabaseSettings, Settings},
    db::{
        AccountRepository, InMemoryAccountRepository, InMemoryRefreshTokenRepository,
        PgAccountRepository, PgRefreshTokenRepository, RefreshTokenRepository,
    },
    security::JwtSigner,
    services::{spawn_token_reaper, AuthService, RefreshTokenStore},
    telemetry, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let settings = Settings::from_env().context("Failed to load configuration")?;
    info!(
        address = %settings.server.bind_address(),
        issuer = %settings.jwt.issuer,
        "Starting auth-service"
    );

    let db_pool = match &settings.database {
        Some(database) => Some(connect_database(database).await?),
        None => {
            tracing::warn!("DATABASE_URL not set; accounts and tokens are kept in memory");
            None
        }
    };

    let (account_repo, token_repo): (Arc<dyn AccountRepository>, Arc<dyn RefreshTokenRepository>) =
        match &db_pool {
            Some(pool) => (
                Arc::new(PgAccountRepository::new(pool.clone())),
                Arc::new(PgRefreshTokenRepository::new(pool.clone())),
            ),
            None => (
                Arc::new(InMemoryAccountRepository::new()),
                Arc::new(InMemoryRefreshTokenRepository::new()),
            ),
        };

    let signer = JwtSigner::new(
        settings.jwt.secret.as_bytes(),
        settings.jwt.issuer.clone(),
        settings.jwt.access_token_ttl,
    )
    .context("Failed to initialize token signer")?;

    let refresh_tokens = RefreshTokenStore::new(token_repo, settings.jwt.refresh_token_ttl);
    let auth = AuthService::new(account_repo, refresh_tokens.clone(), signer);

    let reaper = spawn_token_reaper(refresh_tokens, settings.reaper.interval);

    let app = build_router(AppState::new(auth));
    let addr = settings.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("REST API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST server failed")?;

    reaper.abort();
    if let Some(pool) = db_pool {
        pool.close().await;
    }
    info!("auth-service stopped");

    Ok(())
}

async fn connect_database(database: &DatabaseSettings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout)
        .connect(&database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection pool initialized");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
