//! Finance Tracker is a web service for recording personal income and
//! expenses.
//!
//! Users record transactions against income and expense categories, set
//! budgets, track savings goals and view monthly and per-category summaries
//! ready for charting.
//!
//! This library provides a JSON REST API over a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use time::Date;
use tokio::signal;

mod app_state;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod routing;
mod savings_goal;
mod seed;
mod timezone;
mod transaction;
mod user;

pub use app_state::AppState;
pub use dashboard::{
    ChartSeries, DEFAULT_BALANCE_MONTHS, Dashboard, DashboardChart, IncomeExpenseSeries, Locale,
    build_dashboard, compute_category_breakdown, compute_income_expense_series,
    compute_monthly_balance, dashboard_charts,
};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use seed::{SeedSummary, seed_demo_data};
pub use timezone::{get_local_offset, get_local_today};
pub use user::{User, UserID, Username, get_user_by_id};

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
    /// An empty string was used as a username.
    #[error("Username cannot be empty")]
    EmptyUsername,

    /// The username is already taken by another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// The user already has a category with this name.
    #[error("a category named \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used to create a savings goal name.
    #[error("Savings goal name cannot be empty")]
    EmptyGoalName,

    /// A name was longer than the maximum number of characters allowed.
    #[error("name is longer than {0} characters")]
    NameTooLong(usize),

    /// A monetary amount failed validation.
    ///
    /// Transaction, budget and target amounts must be at least 0.01 and have
    /// at most two decimal places.
    #[error("invalid amount {0}: {1}")]
    InvalidAmount(f64, &'static str),

    /// The end of a date range is before its start.
    #[error("the end date {end} is before the start date {start}")]
    InvalidDateRange {
        /// The first day of the range.
        start: Date,
        /// The last day of the range.
        end: Date,
    },

    /// The category ID does not refer to a category owned by the user.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(DatabaseId),

    /// Budgets can only be set for expense categories.
    #[error("budgets can only be set for expense categories")]
    BudgetCategoryNotExpense,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A request or response body could not be read.
    #[error("could not read the message body")]
    BodyReadError,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update a savings goal that does not exist
    #[error("tried to update a savings goal that is not in the database")]
    UpdateMissingSavingsGoal,

    /// Tried to delete a savings goal that does not exist
    #[error("tried to delete a savings goal that is not in the database")]
    DeleteMissingSavingsGoal,
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

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyUsername
            | Error::EmptyCategoryName
            | Error::EmptyGoalName
            | Error::NameTooLong(_)
            | Error::InvalidAmount(_, _)
            | Error::InvalidDateRange { .. }
            | Error::InvalidCategory(_)
            | Error::BudgetCategoryNotExpense => StatusCode::BAD_REQUEST,
            Error::DuplicateUsername(_) | Error::DuplicateCategoryName(_) => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingBudget
            | Error::UpdateMissingSavingsGoal
            | Error::DeleteMissingSavingsGoal => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::BodyReadError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            // Internal errors are not intended to be shown to the client.
            error if status_code == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status_code, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let response = Error::InvalidAmount(0.0, "must be at least 0.01").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_resources_are_not_found() {
        let response = Error::DeleteMissingTransaction.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"],
            "An unexpected error occurred, check the server logs for more details."
        );
    }
}
