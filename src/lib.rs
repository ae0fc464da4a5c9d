//! Wallet is a web app for tracking your personal income and expenses.
//!
//! This library provides a server that directly serves HTML pages: users
//! register and log in, record incomes and expenses, view a dashboard of
//! their totals and download monthly CSV reports.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod dashboard;
mod db;
mod endpoints;
mod export;
mod flash;
mod forbidden;
mod home;
mod html;
mod internal_server_error;
mod logging;
mod manage;
mod month;
mod navigation;
mod not_found;
mod record;
mod routing;
mod timezone;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{Email, PasswordHash, User, UserID, ValidatedPassword, create_user};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use record::{
    Expense, ExpenseCategory, Income, IncomeSource, RecordFields, create_record,
};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{
    forbidden::get_403_forbidden_response, html::error_view,
    internal_server_error::InternalServerError, not_found::get_404_not_found_response,
};

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
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// A user with the same email address has already registered.
    #[error("a user with that email address already exists")]
    DuplicateUser,

    /// A record referred to a user that does not exist.
    #[error("the user ID does not refer to a registered user")]
    InvalidUser,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The requested record belongs to another user.
    #[error("the record belongs to another user")]
    Forbidden,

    /// A year and month that do not form a valid calendar month.
    #[error("{year}-{month} is not a valid month")]
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month, which should be between 1 and 12.
        month: u8,
    },

    /// Tried to update a record that does not exist
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing a CSV report.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateUser
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidUser
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissingRecord | Error::DeleteMissingRecord => {
                get_404_not_found_response()
            }
            Error::Forbidden => get_403_forbidden_response(),
            Error::InvalidMonth { year, month } => (
                StatusCode::BAD_REQUEST,
                Html(
                    error_view(
                        "Bad Request",
                        "400",
                        "Invalid month",
                        &format!(
                            "{year}-{month} is not a valid month. \
                            Pick a year and a month between 1 and 12."
                        ),
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
