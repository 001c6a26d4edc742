//! Expense business logic - Validation and the four CRUD operations.
//!
//! Incoming request bodies are deliberately loose ([`ExpenseRequest`]): every field is
//! optional and `amount` may be a JSON number or a numeric string. [`ExpenseRequest::validate`]
//! turns that into a typed [`ExpenseInput`] or a validation error. Each mutating operation
//! then issues exactly one SQL statement; "not found" is detected from the affected-row count
//! rather than a prior lookup.

use crate::{
    entities::{Category, Expense, expense},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

const REQUIRED_FIELDS_MESSAGE: &str = "Category and a valid amount are required.";
const INVALID_DATE_MESSAGE: &str = "Invalid date format. Expected format: YYYY-MM-DD";
const INVALID_ID_MESSAGE: &str = "A valid expense ID is required.";

/// Request body accepted by create and update.
///
/// `type` and `notes` are accepted as aliases for `category` and `description`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExpenseRequest {
    /// Category name, matched case-insensitively
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    /// Positive amount as a JSON number or numeric string
    #[serde(default)]
    pub amount: Option<Value>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    #[serde(default)]
    pub date: Option<String>,
    /// Free-text note
    #[serde(default, alias = "notes")]
    pub description: Option<String>,
}

/// Validated expense fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    /// Parsed category
    pub category: Category,
    /// Positive amount rounded to cents
    pub amount: f64,
    /// Date when one was supplied
    pub date: Option<NaiveDate>,
    /// Description, empty when absent
    pub description: String,
}

impl ExpenseRequest {
    /// Validates the raw request into an [`ExpenseInput`].
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the category is missing or unknown, the amount is
    /// missing, non-numeric or not positive, or the date is malformed.
    pub fn validate(self) -> Result<ExpenseInput> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::validation(REQUIRED_FIELDS_MESSAGE))?
            .parse::<Category>()
            .map_err(Error::validation)?;

        let amount = parse_amount(self.amount.as_ref())?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };

        Ok(ExpenseInput {
            category,
            amount,
            date,
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Parses a request amount: finite, strictly positive, rounded to cents.
///
/// # Errors
/// Returns [`Error::Validation`] when the value is missing, not numeric, or not positive
/// after rounding.
pub fn parse_amount(value: Option<&Value>) -> Result<f64> {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount
        .map(round_to_cents)
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| Error::validation(REQUIRED_FIELDS_MESSAGE))
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Parses an expense date.
///
/// Accepts exactly `YYYY-MM-DD`, or an RFC 3339 timestamp whose calendar date (in its own
/// offset) is used.
///
/// # Errors
/// Returns [`Error::Validation`] for anything else, including impossible dates.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if is_plain_date_shape(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| Error::validation(INVALID_DATE_MESSAGE));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| Error::validation(INVALID_DATE_MESSAGE))
}

fn is_plain_date_shape(raw: &str) -> bool {
    raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parses an `:id` path segment.
///
/// # Errors
/// Returns [`Error::Validation`] if the segment is not an integer.
pub fn parse_expense_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::validation(INVALID_ID_MESSAGE))
}

/// Retrieves every expense, ordered by id.
pub async fn list_expenses(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    Expense::find()
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new expense with a single INSERT statement.
///
/// When the input carries no date, `today` is stored. The returned model is assembled from
/// the input and the id reported by the store, without reading the row back.
#[instrument(skip(db))]
pub async fn create_expense(
    db: &DatabaseConnection,
    input: ExpenseInput,
    today: NaiveDate,
) -> Result<expense::Model> {
    let date = input.date.unwrap_or(today);

    let new_expense = expense::ActiveModel {
        category: Set(input.category),
        amount: Set(input.amount),
        date: Set(date),
        description: Set(input.description.clone()),
        ..Default::default()
    };

    let result = Expense::insert(new_expense).exec(db).await?;
    info!(
        "Created expense {}: category={}, amount={:.2}, date={}",
        result.last_insert_id, input.category, input.amount, date
    );

    Ok(expense::Model {
        id: result.last_insert_id,
        category: input.category,
        amount: input.amount,
        date,
        description: input.description,
    })
}

/// Overwrites the mutable fields of an expense with a single UPDATE statement.
///
/// Category, amount and description are always written. The date is only written when
/// the input carries one.
///
/// # Errors
/// Returns [`Error::ExpenseNotFound`] if no row has `expense_id`.
#[instrument(skip(db))]
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    input: ExpenseInput,
) -> Result<()> {
    let mut changes = expense::ActiveModel {
        category: Set(input.category),
        amount: Set(input.amount),
        description: Set(input.description),
        ..Default::default()
    };
    if let Some(date) = input.date {
        changes.date = Set(date);
    }

    let result = Expense::update_many()
        .set(changes)
        .filter(expense::Column::Id.eq(expense_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }

    info!(
        "Updated expense {}: category={}, amount={:.2}",
        expense_id, input.category, input.amount
    );
    Ok(())
}

/// Removes an expense with a single DELETE statement.
///
/// # Errors
/// Returns [`Error::ExpenseNotFound`] if no row has `expense_id`.
#[instrument(skip(db))]
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }

    info!("Deleted expense {}", expense_id);
    Ok(())
}
