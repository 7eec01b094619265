// ABOUTME: HTTP API layer for the todo service
// ABOUTME: Builds the axum router and the shared state handed to every handler

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use todos_fetch::{FetchConfig, TodoFetcher};
use todos_storage::TodoStore;

pub mod error;
pub mod health;
pub mod response;
pub mod todos_handlers;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub fetcher: TodoFetcher,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, fetch_config: FetchConfig) -> Self {
        let fetcher = TodoFetcher::new(store.clone(), fetch_config);
        Self { store, fetcher }
    }
}

/// Creates the todo API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/api/health", get(health::health_check))
        .route("/todos", get(todos_handlers::list_todos))
        .route("/todoschannel", get(todos_handlers::list_todos_partitioned))
        .route("/todo", post(todos_handlers::create_todo))
        .route("/todobulk", post(todos_handlers::create_bulk_todos))
        .route("/todo/search", get(todos_handlers::search_todos))
        .route("/todo/done/{id}", put(todos_handlers::mark_todo_done))
        .route("/todo/favorite/{id}", put(todos_handlers::mark_todo_favorite))
        .route(
            "/todo/{id}",
            get(todos_handlers::get_todo)
                .put(todos_handlers::update_todo)
                .delete(todos_handlers::delete_todo),
        )
        .fallback(health::not_found)
        .method_not_allowed_fallback(health::method_not_allowed)
        .with_state(state)
}
