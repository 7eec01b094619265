use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use todos_fetch::FetchError;
use todos_storage::StorageError;

use crate::response::ApiResponse;

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid todo id: {0}")]
    InvalidId(String),

    #[error("url not found")]
    RouteNotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Fetch(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Storage(StorageError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients
    fn user_message(&self) -> String {
        match self {
            ApiError::Validation(msg) => format!("Validation failed: {}", msg),
            ApiError::InvalidId(raw) => format!("Invalid todo id '{}'", raw),
            ApiError::RouteNotFound | ApiError::MethodNotAllowed => self.to_string(),
            ApiError::Fetch(FetchError::InvalidRequest(msg)) => msg.clone(),
            ApiError::Fetch(_) => "Failed to fetch todos".to_string(),
            ApiError::Storage(StorageError::NotFound) => "Todo not found".to_string(),
            ApiError::Storage(StorageError::InvalidInput(msg)) => msg.clone(),
            ApiError::Storage(_) => "Data storage error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let mut body = ApiResponse::error(status, self.user_message());

        if status.is_server_error() {
            let request_id = Uuid::new_v4().to_string();
            error!(request_id = %request_id, error = %self, "Request failed");
            body = body.with_request_id(request_id);
        } else {
            info!(code = status.as_u16(), error = %self, "API error response");
        }

        (status, ResponseJson(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
