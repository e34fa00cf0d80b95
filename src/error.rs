//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a request with missing or malformed query parameters.
    ///
    /// The message describes which parameter was wrong and is safe to show to
    /// the client.
    #[error("{0}")]
    InvalidRequest(String),

    /// The dataset could not be downloaded.
    #[error("could not fetch the dataset: {0}")]
    DatasetFetch(String),

    /// The dataset is not a JSON array of transaction records.
    #[error("could not decode the dataset: {0}")]
    DatasetDecode(String),

    /// A record in the dataset breaks one of the transaction invariants, e.g.
    /// a negative price or a date without a month.
    #[error("invalid dataset record #{index}: {reason}")]
    InvalidRecord {
        /// The zero-based position of the record in the dataset.
        index: usize,
        /// What is wrong with the record.
        reason: String,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking database task panicked or was cancelled.
    #[error("a database task failed to complete: {0}")]
    TaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::DatasetFetch(value.to_string())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

/// The body of every error response.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody<'a> {
    pub error: &'a str,
}

/// Render a JSON error response with `status` and `message`.
pub(crate) fn render_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl Error {
    /// Convert the error into a JSON response for the client.
    ///
    /// Invalid requests are reported with status 400 and their own message.
    /// Every other error is logged and replaced by `failure_message` with
    /// status 500, so internal details never reach the client.
    pub(crate) fn into_json_response(self, failure_message: &str) -> Response {
        match self {
            Error::InvalidRequest(message) => render_error(StatusCode::BAD_REQUEST, &message),
            error => {
                tracing::error!("{failure_message}: {error}");
                render_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_json_response("An unexpected error occurred")
    }
}
