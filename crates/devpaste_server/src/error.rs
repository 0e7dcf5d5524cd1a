//! HTTP error mapping for API handlers.

use crate::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Handler error wrapper translating [`AppError`] into HTTP responses.
///
/// Only not-found, unauthorized and bad-request outcomes reach the client
/// verbatim. Everything else is logged and answered with a generic 500.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            err if err.is_persistence() => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    AppError::Internal.to_string(),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            not_found => (StatusCode::NOT_FOUND, not_found.to_string()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
