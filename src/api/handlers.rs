//! Expense endpoint handlers.
//!
//! Each handler extracts its inputs, delegates to [`crate::core::expense`], and shapes the
//! JSON response. Errors propagate as [`Error`] and are rendered by its `IntoResponse` impl.

use crate::{
    api::AppState,
    core::expense::{self, ExpenseRequest},
    entities::expense::Model,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;

/// Body returned by successful mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text
    pub message: &'static str,
    /// Id of the created expense; only set by create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    const fn message(message: &'static str) -> Self {
        Self { message, id: None }
    }
}

type Payload = std::result::Result<Json<ExpenseRequest>, JsonRejection>;

fn request_body(payload: Payload) -> Result<ExpenseRequest> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::validation(rejection.body_text()))
}

/// `GET /api/expenses`
pub async fn list_expenses(State(state): State<AppState>) -> Result<Json<Vec<Model>>> {
    let expenses = expense::list_expenses(&state.database).await?;
    Ok(Json(expenses))
}

/// `POST /api/expenses`
pub async fn create_expense(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let input = request_body(payload)?.validate()?;
    let today = Utc::now().date_naive();

    let created = expense::create_expense(&state.database, input, today).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Expense added successfully.",
            id: Some(created.id),
        }),
    ))
}

/// `PUT /api/expenses/:id`
pub async fn update_expense(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Payload,
) -> Result<Json<MessageResponse>> {
    let expense_id = expense::parse_expense_id(&raw_id)?;
    let input = request_body(payload)?.validate()?;

    expense::update_expense(&state.database, expense_id, input).await?;

    Ok(Json(MessageResponse::message("Expense updated successfully.")))
}

/// `DELETE /api/expenses/:id`
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let expense_id = expense::parse_expense_id(&raw_id)?;

    expense::delete_expense(&state.database, expense_id).await?;

    Ok(Json(MessageResponse::message("Expense deleted successfully.")))
}
