//! Expense tracker is a web app for recording personal expenses and seeing
//! where the money goes.
//!
//! This library provides a JSON REST API for storing expenses, a set of pure
//! functions for summarising them ([aggregation]), and server rendered pages
//! that display those summaries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

pub mod aggregation;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
pub mod expense;
mod html;
mod logging;
mod navigation;
mod not_found;
mod reports;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::{DatabaseId, ExpenseId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::{get_local_offset, now_in_timezone};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or empty in the request body.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The category is not one of the fixed set of expense categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The amount was zero, negative or not a finite number.
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    /// A month number outside of 1-12 was given.
    #[error("month must be a number from 1 to 12, got {0}")]
    InvalidMonth(u8),

    /// A year outside of the range of representable dates was given.
    #[error("year must be a number from -9999 to 9999, got {0}")]
    InvalidYear(i32),

    /// The request body could not be parsed as the expected JSON object.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A path or query parameter could not be parsed.
    #[error("invalid request parameters: {0}")]
    InvalidParameters(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("expense not found")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("expense not found")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidParameters(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidParameters(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code to respond with when this error reaches a route handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidCategory(_)
            | Error::InvalidAmount(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // Server errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    async fn get_error_message(error: Error) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        let json: serde_json::Value =
            serde_json::from_slice(&body).expect("Could not parse response body as JSON");

        (status, json["error"].as_str().unwrap().to_owned())
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, message) = get_error_message(Error::InvalidAmount(-5.0)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "amount must be a positive number, got -5");
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let (status, message) = get_error_message(Error::DeleteMissingExpense).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "expense not found");
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let (status, message) = get_error_message(Error::DatabaseLockError).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !message.contains("lock"),
            "got error message \"{message}\" that leaks internal details"
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
