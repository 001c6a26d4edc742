//! Client data layer - talks to the expense API over HTTP.
//!
//! [`ExpenseClient`] issues the four requests. Server rows are normalized into
//! [`ClientExpense`] leniently: a missing or unparseable amount becomes 0.00, missing text
//! fields become empty strings, and a missing or unparseable date becomes the current
//! instant. [`ExpenseBook`] keeps the local list and resynchronizes it with a full refetch
//! after every mutation; failures are logged and leave the local list untouched.

use crate::{
    core::summary::{self, MonthlyTotal},
    entities::Category,
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// An expense as held on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientExpense {
    /// Server-assigned id
    pub id: i64,
    /// Category name as sent by the server, empty if absent
    pub category: String,
    /// Amount, 0.0 if absent or unparseable
    pub amount: f64,
    /// When the expense happened
    pub date: DateTime<Utc>,
    /// Description, empty if absent
    pub description: String,
}

/// Form input sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    /// Selected category
    pub category: Category,
    /// Entered amount
    pub amount: f64,
    /// Free-text note
    pub description: String,
    /// Explicit date; the server stamps today on create when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

fn lenient_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|a| a.is_finite()).unwrap_or(0.0)
}

fn lenient_id(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_date(value: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = value.and_then(Value::as_str).map(str::trim) else {
        return now;
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(now, |naive| naive.and_utc())
}

fn lenient_text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

/// Normalizes one server row. Rows without a usable id are dropped.
#[must_use]
pub fn normalize_expense(item: &Value, now: DateTime<Utc>) -> Option<ClientExpense> {
    let Some(id) = lenient_id(item.get("id")) else {
        warn!("Skipping expense row without a usable id: {}", item);
        return None;
    };

    Some(ClientExpense {
        id,
        category: lenient_text(item.get("category")),
        amount: lenient_amount(item.get("amount")),
        date: lenient_date(item.get("date"), now),
        description: lenient_text(item.get("description")),
    })
}

/// Normalizes a list response.
///
/// # Errors
/// Returns [`Error::UnexpectedResponse`] if the body is not a JSON array.
pub fn normalize_expenses(body: &Value, now: DateTime<Utc>) -> Result<Vec<ClientExpense>> {
    let Some(items) = body.as_array() else {
        return Err(Error::UnexpectedResponse {
            status: 200,
            body: format!("expected an array, received: {body}"),
        });
    };
    Ok(items
        .iter()
        .filter_map(|item| normalize_expense(item, now))
        .collect())
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: Option<i64>,
}

/// HTTP client for the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ExpenseClient {
    /// Creates a client for the server at `base_url`, e.g. `http://localhost:5000`.
    ///
    /// # Errors
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/api/expenses", base_url.trim_end_matches('/')),
        })
    }

    fn item_url(&self, expense_id: i64) -> String {
        format!("{}/{expense_id}", self.endpoint)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::UnexpectedResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// `GET /api/expenses`, normalized.
    pub async fn fetch_expenses(&self) -> Result<Vec<ClientExpense>> {
        let response = self.http.get(&self.endpoint).send().await?;
        let body: Value = Self::ensure_success(response).await?.json().await?;
        normalize_expenses(&body, Utc::now())
    }

    /// `POST /api/expenses`. Returns the new id when the server reports one.
    pub async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Option<i64>> {
        let response = self.http.post(&self.endpoint).json(draft).send().await?;
        let created: CreatedResponse = Self::ensure_success(response).await?.json().await?;
        debug!("Created expense {:?}", created.id);
        Ok(created.id)
    }

    /// `PUT /api/expenses/:id`.
    pub async fn update_expense(&self, expense_id: i64, draft: &ExpenseDraft) -> Result<()> {
        let response = self
            .http
            .put(self.item_url(expense_id))
            .json(draft)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// `DELETE /api/expenses/:id`.
    pub async fn delete_expense(&self, expense_id: i64) -> Result<()> {
        let response = self.http.delete(self.item_url(expense_id)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Local expense list kept in sync with the server.
#[derive(Debug, Clone)]
pub struct ExpenseBook {
    client: ExpenseClient,
    expenses: Vec<ClientExpense>,
}

impl ExpenseBook {
    /// Creates an empty book; call [`ExpenseBook::refresh`] to load it.
    #[must_use]
    pub const fn new(client: ExpenseClient) -> Self {
        Self {
            client,
            expenses: Vec::new(),
        }
    }

    /// Current local list.
    #[must_use]
    pub fn expenses(&self) -> &[ClientExpense] {
        &self.expenses
    }

    /// Replaces the local list with the server's.
    ///
    /// On failure the error is logged and the local list is left as it was.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.client.fetch_expenses().await {
            Ok(expenses) => {
                self.expenses = expenses;
                Ok(())
            }
            Err(e) => {
                error!("Fetch error: {}", e);
                Err(e)
            }
        }
    }

    /// Creates an expense, then refetches the list.
    pub async fn add(&mut self, draft: &ExpenseDraft) -> Result<()> {
        if let Err(e) = self.client.create_expense(draft).await {
            error!("Failed to add expense: {}", e);
            return Err(e);
        }
        self.refresh().await
    }

    /// Updates an expense, then refetches the list.
    pub async fn edit(&mut self, expense_id: i64, draft: &ExpenseDraft) -> Result<()> {
        if let Err(e) = self.client.update_expense(expense_id, draft).await {
            error!("Failed to edit expense {}: {}", expense_id, e);
            return Err(e);
        }
        self.refresh().await
    }

    /// Deletes an expense, then refetches the list.
    pub async fn remove(&mut self, expense_id: i64) -> Result<()> {
        if let Err(e) = self.client.delete_expense(expense_id).await {
            error!("Failed to delete expense {}: {}", expense_id, e);
            return Err(e);
        }
        self.refresh().await
    }

    fn dated_amounts(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.expenses.iter().map(|e| (e.date.date_naive(), e.amount))
    }

    /// Chart data: six trailing monthly totals ending at `today`.
    #[must_use]
    pub fn monthly_totals(&self, today: NaiveDate) -> Vec<MonthlyTotal> {
        summary::trailing_monthly_totals(self.dated_amounts(), today)
    }

    /// Total for the calendar month containing `today`.
    #[must_use]
    pub fn current_month_total(&self, today: NaiveDate) -> f64 {
        summary::current_month_total(self.dated_amounts(), today)
    }
}
