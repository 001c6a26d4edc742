//! Unified error types and result handling.
//!
//! Every layer returns [`Error`]. At the HTTP boundary the error is turned into a
//! status code and an `{ "error": ... }` JSON body by its [`IntoResponse`] impl.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A request field is missing or malformed
    #[error("{message}")]
    Validation {
        /// Human-readable explanation returned to the caller
        message: String,
    },

    /// A mutation targeted an expense id that matched no row
    #[error("Expense not found.")]
    ExpenseNotFound {
        /// The id that was requested
        id: i64,
    },

    /// Underlying storage failure
    #[error("{0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure in the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with what the client expected
    #[error("Unexpected response ({status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code of the response
        status: u16,
        /// Response body, or a description of why it was rejected
        body: String,
    },
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to at the request boundary.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ExpenseNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Http(_)
            | Self::UnexpectedResponse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::ExpenseNotFound { id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_surfaces_driver_message() {
        let err = Error::Database(sea_orm::DbErr::Custom("disk I/O error".to_string()));
        assert!(err.to_string().contains("disk I/O error"));
    }
}
