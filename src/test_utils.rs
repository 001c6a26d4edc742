//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases, seeding
//! expenses with sensible defaults, and serving the API on an ephemeral port.

use crate::{
    api,
    config::database,
    core::expense::{self, ExpenseInput},
    entities::{Category, Expense, expense::Model},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use sea_orm::EntityTrait;
use std::{net::SocketAddr, sync::Arc};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Date stored by [`create_test_expense`].
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default()
}

/// Creates a test expense dated [`test_date`].
pub async fn create_test_expense(
    db: &DatabaseConnection,
    category: Category,
    amount: f64,
    description: &str,
) -> Result<Model> {
    let input = ExpenseInput {
        category,
        amount,
        date: Some(test_date()),
        description: description.to_string(),
    };
    expense::create_expense(db, input, test_date()).await
}

/// Same as [`setup_test_db`], wrapped for sharing with an [`api::AppState`].
pub async fn setup_shared_test_db() -> Result<Arc<DatabaseConnection>> {
    Ok(Arc::new(setup_test_db().await?))
}

/// Looks up a single expense by id.
pub async fn find_expense(db: &DatabaseConnection, id: i64) -> Result<Option<Model>> {
    Ok(Expense::find_by_id(id).one(db).await?)
}

/// Serves the API on `127.0.0.1:0` backed by a fresh in-memory database.
///
/// Returns the bound address and the database handle shared with the server.
pub async fn spawn_test_server() -> Result<(SocketAddr, Arc<DatabaseConnection>)> {
    let db = setup_shared_test_db().await?;
    let app = api::router(api::AppState::new(Arc::clone(&db)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Test server stopped: {}", e);
        }
    });

    Ok((addr, db))
}
