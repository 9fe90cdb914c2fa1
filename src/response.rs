use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::Value;

use crate::error::ApiError;

/// Emit a handler's success payload. Terminal: exactly one write happens per
/// request, and the payload object's keys are handler-defined.
pub fn write_success(payload: Value) -> Response {
    (StatusCode::OK, Json(payload)).into_response()
}

/// Emit `{"error": "<message>"}` with the status mapped from the error kind.
pub fn write_error(error: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error.to_json())).into_response()
}
