//! HTTP error mapping.
//!
//! Every failure becomes `400 Bad Request` with the error message as a plain-text body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipe_storage::StorageError;
use thiserror::Error;
use tracing::warn;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Malformed request input (body, path or query).
    #[error("{0}")]
    Decode(String),
    #[error("missing page parameter")]
    MissingPage,
}

impl AppError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        warn!(error = %message, "Request failed");
        (StatusCode::BAD_REQUEST, message).into_response()
    }
}
