// ABOUTME: Shared API response envelope
// ABOUTME: Every endpoint answers with {data, code, message}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    /// HTTP status code as a decimal string
    pub code: String,
    pub message: String,
    /// Correlates a server error with its log line; absent on every other response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Self {
        ApiResponse {
            data,
            code: status.as_u16().to_string(),
            message: message.into(),
            request_id: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(StatusCode::OK, Some(data), "")
    }

    /// Render with the given status, keeping `code` in sync with it
    pub fn respond(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Response {
        (status, ResponseJson(Self::new(status, data, message))).into_response()
    }
}

impl ApiResponse<()> {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, None, message)
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }
}
