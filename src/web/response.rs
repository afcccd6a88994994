//! Translation of domain failures into JSON error responses.

use crate::error::ThermometerError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::any::Any;
use tracing::error;

/// Build a `{"error": message}` response.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for ThermometerError {
    fn into_response(self) -> Response {
        match &self {
            ThermometerError::InvalidThermometer(_) => {
                error_response(StatusCode::NOT_FOUND, "thermometer not found")
            }
            ThermometerError::CaptureNotFound { .. } => {
                error_response(StatusCode::NOT_FOUND, "temperature not found")
            }
            _ => {
                error!(error = %self, "Request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

/// Response for a handler that panicked.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}
