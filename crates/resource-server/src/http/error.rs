//! Error mapping for the REST endpoint.
//!
//! | Service error | HTTP status |
//! |---------------|-------------|
//! | Validation    | 400         |
//! | NotFound      | 404         |
//! | Transport     | 500         |
//! | Internal      | 500         |
//!
//! Client faults keep their message; infrastructure faults are logged with
//! full detail and answered with an opaque body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use resource_core::ServiceError;
use serde::Serialize;
use tracing::error;

/// Wrapper that turns a [`ServiceError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::Transport(_) | ServiceError::Internal(_) => {
                error!(error = ?self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
