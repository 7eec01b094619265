// ABOUTME: Router-level tests for the todo HTTP API
// ABOUTME: Drives requests through the full axum stack against a temporary SQLite database

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use todos_api::{create_router, AppState};
use todos_fetch::FetchConfig;
use todos_storage::{
    init_pool, PoolConfig, SqliteTodoStore, StorageError, StorageResult, Todo, TodoCreateInput,
    TodoStore, TodoUpdateInput,
};

struct TestApp {
    router: Router,
    store: Arc<SqliteTodoStore>,
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let pool = init_pool(&PoolConfig::for_path(&dir.path().join("todos.db")))
        .await
        .unwrap();
    let store = Arc::new(SqliteTodoStore::new(pool));
    let state = AppState::new(store.clone(), FetchConfig::default());

    TestApp {
        router: create_router(state),
        store,
        _dir: dir,
    }
}

/// Store whose count or range reads fail, for exercising fetch failures end to end
struct BrokenStore {
    fail_count: bool,
}

fn broken() -> StorageResult<()> {
    Err(StorageError::Database("disk I/O error at /var/lib/todos.db".to_string()))
}

#[async_trait]
impl TodoStore for BrokenStore {
    async fn range_read(&self, _limit: i64, _offset: i64) -> StorageResult<Vec<Todo>> {
        broken().map(|_| Vec::new())
    }

    async fn count_all(&self) -> StorageResult<i64> {
        if self.fail_count {
            return broken().map(|_| 0);
        }
        Ok(50)
    }

    async fn search_by_title(&self, _title: &str) -> StorageResult<Vec<Todo>> {
        broken().map(|_| Vec::new())
    }

    async fn get_by_id(&self, _id: i64) -> StorageResult<Todo> {
        Err(StorageError::NotFound)
    }

    async fn create(&self, _input: TodoCreateInput) -> StorageResult<Todo> {
        Err(StorageError::NotFound)
    }

    async fn create_bulk(&self, _input: TodoCreateInput, _count: usize) -> StorageResult<usize> {
        broken().map(|_| 0)
    }

    async fn update(&self, _id: i64, _input: TodoUpdateInput) -> StorageResult<Todo> {
        Err(StorageError::NotFound)
    }

    async fn delete(&self, _id: i64) -> StorageResult<()> {
        broken()
    }
}

fn broken_router(fail_count: bool) -> Router {
    let state = AppState::new(Arc::new(BrokenStore { fail_count }), FetchConfig::default());
    create_router(state)
}

async fn seed(store: &SqliteTodoStore, rows: usize) {
    store
        .create_bulk(
            TodoCreateInput {
                title: "Seeded".to_string(),
                description: String::new(),
            },
            rows,
        )
        .await
        .unwrap();
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call(&app.router, method, uri, body).await
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_ping() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/ping", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": "pong", "code": "200", "message": ""}));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_list_envelope() {
    let app = test_app().await;
    seed(&app.store, 95).await;

    let (status, body) = send(&app, Method::GET, "/todos?page=1&limit=10", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "200");
    let data = &body["data"];
    assert_eq!(data["data"].as_array().unwrap().len(), 10);
    assert_eq!(data["count"], 95);
    assert_eq!(data["limit"], 10);
    assert_eq!(data["page"], 1);
    assert_eq!(data["min_page"], 1);
    assert_eq!(data["max_page"], 10);
}

#[tokio::test]
async fn test_list_defaults_for_missing_or_garbage_params() {
    let app = test_app().await;
    seed(&app.store, 5).await;

    for uri in ["/todos", "/todos?page=abc&limit=", "/todoschannel?channel=x"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;

        assert_eq!(status, StatusCode::OK, "uri: {}", uri);
        assert_eq!(body["data"]["page"], 1);
        assert_eq!(body["data"]["limit"], 100);
        assert_eq!(body["data"]["data"].as_array().unwrap().len(), 5);
    }
}

#[tokio::test]
async fn test_channel_listing_matches_plain_listing() {
    let app = test_app().await;
    seed(&app.store, 40).await;

    let ids = |body: &Value| {
        let mut ids: Vec<i64> = body["data"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect();
        ids.sort_unstable();
        ids
    };

    let (_, plain) = send(&app, Method::GET, "/todos?page=2&limit=12", None).await;
    let (status, partitioned) =
        send(&app, Method::GET, "/todoschannel?page=2&limit=12&channel=5", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&partitioned), ids(&plain));
    assert_eq!(partitioned["data"]["count"], 40);
    assert_eq!(partitioned["data"]["max_page"], 4);
}

#[tokio::test]
async fn test_negative_limit_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/todoschannel?limit=-4", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "400");
    assert_eq!(body["data"], Value::Null);
    assert!(body.get("request_id").is_none());
}

#[tokio::test]
async fn test_create_and_get() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/todo",
        Some(json!({"title": "  Write tests ", "description": "for the API"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Insert Todo: Success");
    assert_eq!(created["data"]["title"], "Write tests");
    assert_eq!(created["data"]["completed"], false);

    let id = created["data"]["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/todo/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["data"]["id"], id);
    assert_eq!(fetched["data"]["data"]["description"], "for the API");
}

#[tokio::test]
async fn test_create_requires_title() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::POST, "/todo", Some(json!({"title": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "400");

    let (status, _) = send(&app, Method::POST, "/todo", Some(json!({"description": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_bulk() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/todobulk",
        Some(json!({"todo": {"title": "Bulk", "description": ""}, "countBulk": 25})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "insert 25 data success");
    assert_eq!(app.store.count_all().await.unwrap(), 25);

    let (status, _) = send(
        &app,
        Method::POST,
        "/todobulk",
        Some(json!({"todo": {"title": "Bulk"}, "countBulk": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update() {
    let app = test_app().await;
    let (_, created) = send(
        &app,
        Method::POST,
        "/todo",
        Some(json!({"title": "Draft", "description": "first"})),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/todo/{}", id),
        Some(json!({"title": "", "completed": true})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Update todo: success");
    assert_eq!(body["data"]["title"], "Draft");
    assert_eq!(body["data"]["description"], "first");
    assert_eq!(body["data"]["completed"], true);
}

#[tokio::test]
async fn test_update_missing_todo() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::PUT, "/todo/404", Some(json!({"title": "x"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Todo not found");
}

#[tokio::test]
async fn test_delete() {
    let app = test_app().await;
    seed(&app.store, 1).await;

    let (status, body) = send(&app, Method::DELETE, "/todo/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete Todo: Success");

    let (status, _) = send(&app, Method::GET, "/todo/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/todo/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "400");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/nonexistent", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "url not found");
}

#[tokio::test]
async fn test_wrong_method() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::PATCH, "/todos", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "method not allowed");
}

#[tokio::test]
async fn test_failed_partition_is_server_error() {
    let router = broken_router(false);

    let (status, body) = call(&router, Method::GET, "/todoschannel?limit=10&channel=3", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "500");
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["message"], "Failed to fetch todos");
    assert!(!body.to_string().contains("/var/lib"));

    let request_id = body["request_id"].as_str().unwrap();
    assert!(uuid_like(request_id), "request_id: {}", request_id);
}

#[tokio::test]
async fn test_failed_count_is_server_error() {
    let router = broken_router(true);

    for uri in ["/todos", "/todoschannel?channel=4"] {
        let (status, body) = call(&router, Method::GET, uri, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "uri: {}", uri);
        assert_eq!(body["code"], "500");
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["message"], "Failed to fetch todos");
        assert!(body["request_id"].is_string());
    }
}

#[tokio::test]
async fn test_request_ids_are_unique_per_error() {
    let router = broken_router(true);

    let (_, first) = call(&router, Method::GET, "/todos", None).await;
    let (_, second) = call(&router, Method::GET, "/todos", None).await;

    assert_ne!(first["request_id"], second["request_id"]);
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}

async fn create(app: &TestApp, title: &str) -> i64 {
    let (_, created) = send(app, Method::POST, "/todo", Some(json!({ "title": title }))).await;
    created["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_search_by_title() {
    let app = test_app().await;
    create(&app, "Buy milk").await;
    create(&app, "Walk dog").await;
    create(&app, "Buy bread").await;

    let (status, body) = send(&app, Method::GET, "/todo/search?title=Buy", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "200");
    assert_eq!(body["data"]["count"], 2);
    let titles: Vec<&str> = body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Buy bread", "Buy milk"]);

    let (status, body) = send(&app, Method::GET, "/todo/search?title=zzz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 0);

    let (_, body) = send(&app, Method::GET, "/todo/search", None).await;
    assert_eq!(body["data"]["count"], 3);
}

#[tokio::test]
async fn test_search_rejects_oversized_title() {
    let app = test_app().await;

    let uri = format!("/todo/search?title={}", "x".repeat(300));
    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "400");
}

#[tokio::test]
async fn test_mark_done_only_sets_completed() {
    let app = test_app().await;
    let id = create(&app, "Finish report").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/todo/done/{}", id),
        Some(json!({"is_done": true})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Mark todo as done: success");
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["favorite"], false);
    assert_eq!(body["data"]["title"], "Finish report");

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/todo/done/{}", id),
        Some(json!({"is_done": false})),
    )
    .await;
    assert_eq!(body["data"]["completed"], false);
}

#[tokio::test]
async fn test_mark_favorite_only_sets_favorite() {
    let app = test_app().await;
    let id = create(&app, "Read book").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/todo/favorite/{}", id),
        Some(json!({"is_favorite": true})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Mark todo as favorite: success");
    assert_eq!(body["data"]["favorite"], true);
    assert_eq!(body["data"]["completed"], false);

    let stored = app.store.get_by_id(id).await.unwrap();
    assert!(stored.favorite);
}

#[tokio::test]
async fn test_flag_routes_validate_input() {
    let app = test_app().await;
    let id = create(&app, "Flags").await;

    // Non-boolean flag values are rejected
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/todo/done/{}", id),
        Some(json!({"is_done": "maybe"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "400");

    let (status, _) = send(&app, Method::PUT, "/todo/favorite/0", Some(json!({"is_favorite": true}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PUT, "/todo/done/999", Some(json!({"is_done": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Todo not found");
}
