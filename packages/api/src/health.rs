use axum::{extract::State, http::StatusCode, response::Response, Json};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::AppState;

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn ping() -> Response {
    ApiResponse::respond(StatusCode::OK, Some("pong"), "")
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match state.store.count_all().await {
        Ok(_) => "connected",
        Err(_) => "unavailable",
    };

    Json(json!({
        "status": "healthy",
        "timestamp": unix_timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "todos",
        "database": database,
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
