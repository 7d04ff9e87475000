// --- File: crates/nextdoor_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, NextdoorError};

/// Extension trait for NextdoorError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for NextdoorError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Same envelope as the success bodies: `success` first, then the payload.
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "code": status_code.as_u16(),
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for NextdoorError to make it easier to use in Axum handlers.
impl IntoResponse for NextdoorError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
