//! Every handler returns `Result<T, ServerError>`; the error renders as a
//! JSON body of the form `{"error": "..."}` with a matching status code.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const MESSAGE_NOT_FOUND: &str = "Message not found";
pub const FIELDS_REQUIRED: &str = "Both body and username are required";

#[derive(Debug, Error)]
pub enum ServerError {
    /// A required field was missing or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// The request body could not be read as the expected JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Storage or runtime failure. Details are logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn message_not_found() -> Self {
        ServerError::NotFound(MESSAGE_NOT_FOUND.to_owned())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match self {
            ServerError::Validation(m) | ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        ServerError::Internal(format!("{e:#}"))
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("spawn_blocking join error: {e}"))
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}
