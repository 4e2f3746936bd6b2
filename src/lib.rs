pub mod access;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod http;
mod middleware;
pub mod models;
pub mod state;
pub mod validation;

use axum::Router;
use config::Config;
use db::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
use errors::AppError;
use middleware::cors_layer;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Routes, the JSON 404 fallback and request tracing over both. CORS is
/// added by `start_server` from config.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(http::create_http_routes(state))
        .fallback(|| async { AppError::NotFound("Route not found".into()) })
        .layer(TraceLayer::new_for_http())
}

async fn connect_store(config: &Config) -> Result<Arc<dyn CatalogStore>, AppError> {
    if config.uses_memory_store() {
        tracing::warn!("DATABASE_URL=memory: catalog data will not outlive the process");
        return Ok(Arc::new(MemoryCatalogStore::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to Postgres: {}", e)))?;

    let store = PgCatalogStore::new(pool);
    store.migrate().await?;
    Ok(Arc::new(store))
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let store = connect_store(&config).await?;
    let state = AppState::new(store, config.jwt_secret.as_str());

    let app = build_app(state).layer(cors_layer(&config.allowed_origins)?);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Catalog API listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
