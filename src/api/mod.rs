//! HTTP layer - axum router, shared state, and server lifecycle
//!
//! The router binds the expense endpoints to [`handlers`]. Handlers never reach for a
//! global connection: the database handle lives in [`AppState`] and is injected through
//! axum's `State` extractor, so tests can hand in an in-memory or mock database.

/// Request handlers for the expense endpoints
pub mod handlers;

use crate::{config::ServerConfig, errors::Result};
use axum::{
    Router,
    routing::{get, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared data available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all storage operations, shared across requests
    pub database: Arc<DatabaseConnection>,
}

impl AppState {
    /// Creates a new `AppState` around the given database connection.
    #[must_use]
    pub const fn new(database: Arc<DatabaseConnection>) -> Self {
        Self { database }
    }
}

/// Builds the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .route(
            "/api/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/api/expenses/:id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn run_server(config: &ServerConfig, database: DatabaseConnection) -> Result<()> {
    let addr = config.socket_addr()?;
    let app = router(AppState::new(Arc::new(database)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
