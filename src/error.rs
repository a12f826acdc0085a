//! Error handler for auditing.

use axum::extract::rejection::JsonRejection;
use axum::{BoxError, Json};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SQLxError;
use thiserror::Error;
use tower::timeout::error::Elapsed;

use crate::crypto::CryptoError;
use crate::model::Envelope;

pub type Result<T> = std::result::Result<T, ServerError>;

const INTERNAL_SERVER_ERROR: &str = "Internal server error.";
const REQUEST_TIMED_OUT: &str = "Request timed out.";

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("internal server error, {details}")]
    Internal {
        details: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Body(rejection) => (
                rejection.status(),
                Json(Envelope::failed().with_error("body", rejection.body_text())),
            )
                .into_response(),

            ServerError::Internal { details, source } => {
                tracing::error!(error = ?source, %details, "server returned 500 status");
                internal_server_error()
            },

            err => {
                tracing::error!(error = %err, "server returned 500 status");
                internal_server_error()
            },
        }
    }
}

/// Turn middleware errors into an [`Envelope`].
///
/// A request exceeding the timeout gets `408 Request Timeout`.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        tracing::warn!("request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(Envelope::failed().with_error("request", REQUEST_TIMED_OUT)),
        )
            .into_response();
    }

    tracing::error!(error = %err, "unhandled middleware error");
    internal_server_error()
}

fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::new(INTERNAL_SERVER_ERROR)),
    )
        .into_response()
}
