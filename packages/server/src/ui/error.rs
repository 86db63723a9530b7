//! Mapping of use case errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::ApiErrorResponse,
    usecase::{ErrorKind, UseCaseError},
};

const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable. Please try again later.";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the `{status, error, message}` body
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiErrorResponse {
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        // Store and serialization details stay in the logs
        let message = match self.kind() {
            ErrorKind::StoreUnavailable => {
                tracing::error!("Shared store failure: {}", self);
                UNAVAILABLE_MESSAGE.to_string()
            }
            ErrorKind::Serialization => {
                tracing::error!("Unexpected error: {}", self);
                UNEXPECTED_MESSAGE.to_string()
            }
            _ => {
                tracing::warn!("Request rejected ({}): {}", status, self);
                self.to_string()
            }
        };
        error_response(status, message)
    }
}
