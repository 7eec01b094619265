// ABOUTME: HTTP request handlers for todo operations
// ABOUTME: Paginated listing through the fetch engine plus single-record CRUD

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use todos_fetch::{FetchRequest, PageMeta};
use todos_storage::{Todo, TodoCreateInput, TodoUpdateInput};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::validation::{
    check_search_term, parse_id, parse_query_number, validate_bulk_count, validate_description,
    validate_title, validate_title_update,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Number of concurrent partitions, only honored by the channel endpoint
    pub channel: Option<String>,
}

/// Page of todos plus pagination metadata
#[derive(Debug, Serialize)]
pub struct TodoPage {
    pub data: Vec<Todo>,
    /// Total rows in the table, not just this page
    pub count: i64,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Wrapper used when a single todo is returned
#[derive(Debug, Serialize)]
pub struct TodoData {
    pub data: Todo,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBulkRequest {
    pub todo: CreateTodoRequest,
    #[serde(rename = "countBulk")]
    pub count_bulk: i64,
}

#[derive(Debug, Serialize)]
pub struct BulkCreated {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchTodosQuery {
    #[serde(default)]
    pub title: String,
}

/// Todos matching a title search
#[derive(Debug, Serialize)]
pub struct TodoMatches {
    pub data: Vec<Todo>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct DoneRequest {
    pub is_done: bool,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub is_favorite: bool,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

fn create_input(request: CreateTodoRequest) -> ApiResult<TodoCreateInput> {
    Ok(TodoCreateInput {
        title: validate_title(&request.title)?,
        description: validate_description(&request.description)?,
    })
}

async fn list_page(state: &AppState, request: FetchRequest) -> ApiResult<Response> {
    let result = state.fetcher.fetch(request).await?;

    let page = TodoPage {
        data: result.records,
        count: result.total_count,
        meta: result.page,
    };

    Ok(ApiResponse::respond(StatusCode::OK, Some(page), ""))
}

/// List one page of todos with a single worker
pub async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<ListTodosQuery>,
) -> ApiResult<Response> {
    info!("Listing todos (page: {:?}, limit: {:?})", params.page, params.limit);

    let request = FetchRequest {
        page: parse_query_number(params.page.as_deref()),
        limit: parse_query_number(params.limit.as_deref()),
        partitions: Some(1),
    };

    list_page(&state, request).await
}

/// List one page of todos split across `channel` concurrent workers
pub async fn list_todos_partitioned(
    State(state): State<AppState>,
    Query(params): Query<ListTodosQuery>,
) -> ApiResult<Response> {
    info!(
        "Listing todos (page: {:?}, limit: {:?}, channel: {:?})",
        params.page, params.limit, params.channel
    );

    let request = FetchRequest {
        page: parse_query_number(params.page.as_deref()),
        limit: parse_query_number(params.limit.as_deref()),
        partitions: parse_query_number(params.channel.as_deref()),
    };

    list_page(&state, request).await
}

/// Get a single todo by ID
pub async fn get_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    info!("Getting todo: {}", id);

    let todo = state.store.get_by_id(id).await?;
    Ok(ApiResponse::respond(
        StatusCode::OK,
        Some(TodoData { data: todo }),
        "",
    ))
}

/// Create a new todo
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let input = create_input(body(payload)?)?;
    info!("Creating todo: {}", input.title);

    let todo = state.store.create(input).await?;
    Ok(ApiResponse::respond(
        StatusCode::CREATED,
        Some(todo),
        "Insert Todo: Success",
    ))
}

/// Create `countBulk` copies of the same todo
pub async fn create_bulk_todos(
    State(state): State<AppState>,
    payload: Result<Json<CreateBulkRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let request = body(payload)?;
    let count = validate_bulk_count(request.count_bulk)?;
    let input = create_input(request.todo)?;
    info!("Bulk creating {} todos: {}", count, input.title);

    let inserted = state.store.create_bulk(input, count).await?;
    Ok(ApiResponse::respond(
        StatusCode::CREATED,
        Some(BulkCreated { count: inserted }),
        format!("insert {} data success", inserted),
    ))
}

/// Search todos whose title contains the `title` query parameter
pub async fn search_todos(
    State(state): State<AppState>,
    Query(params): Query<SearchTodosQuery>,
) -> ApiResult<Response> {
    let needle = params.title.trim();
    check_search_term(needle)?;
    info!("Searching todos by title: {:?}", needle);

    let todos = state.store.search_by_title(needle).await?;
    let count = todos.len();
    Ok(ApiResponse::respond(
        StatusCode::OK,
        Some(TodoMatches { data: todos, count }),
        "",
    ))
}

/// Set only the completed flag
pub async fn mark_todo_done(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<DoneRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let request = body(payload)?;
    info!("Marking todo {} done: {}", id, request.is_done);

    let input = TodoUpdateInput {
        completed: Some(request.is_done),
        ..Default::default()
    };

    let todo = state.store.update(id, input).await?;
    Ok(ApiResponse::respond(
        StatusCode::OK,
        Some(todo),
        "Mark todo as done: success",
    ))
}

/// Set only the favorite flag
pub async fn mark_todo_favorite(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let request = body(payload)?;
    info!("Marking todo {} favorite: {}", id, request.is_favorite);

    let input = TodoUpdateInput {
        favorite: Some(request.is_favorite),
        ..Default::default()
    };

    let todo = state.store.update(id, input).await?;
    Ok(ApiResponse::respond(
        StatusCode::OK,
        Some(todo),
        "Mark todo as favorite: success",
    ))
}

/// Update a todo; empty text fields keep their stored values
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    let request = body(payload)?;
    info!("Updating todo: {}", id);

    let input = TodoUpdateInput {
        title: validate_title_update(request.title.as_deref())?,
        description: request
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?,
        completed: request.completed,
        favorite: request.favorite,
    };

    let todo = state.store.update(id, input).await?;
    Ok(ApiResponse::respond(
        StatusCode::OK,
        Some(todo),
        "Update todo: success",
    ))
}

/// Delete a todo
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id(&raw_id)?;
    info!("Deleting todo: {}", id);

    state.store.delete(id).await?;
    Ok(ApiResponse::<()>::respond(
        StatusCode::OK,
        None,
        "Delete Todo: Success",
    ))
}
