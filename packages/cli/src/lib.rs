use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use todos_api::{create_router, AppState};
use todos_storage::{init_pool, SqliteTodoStore, TodoCreateInput, TodoStore};

pub mod config;

use config::Config;

/// Install the global tracing subscriber, honoring `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(false)
        .compact()
        .init();
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers(Any);

    if origin == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", origin))?;
    Ok(cors.allow_origin(origin))
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<SqliteTodoStore>> {
    let pool = init_pool(&config.database)
        .await
        .context("Failed to open todo database")?;
    Ok(Arc::new(SqliteTodoStore::new(pool)))
}

/// Build the full application: routes plus CORS and request logging
pub fn build_app(store: Arc<dyn TodoStore>, config: &Config) -> anyhow::Result<Router> {
    let state = AppState::new(store, config.fetch.clone());

    Ok(create_router(state)
        .layer(cors_layer(&config.cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let app = build_app(store, &config)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", addr);
    info!("CORS origin: {}", config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Insert `count` copies of a todo, for load-testing the list endpoints
pub async fn seed(config: Config, title: String, description: String, count: usize) -> anyhow::Result<()> {
    let store = open_store(&config).await?;

    let inserted = store
        .create_bulk(TodoCreateInput { title, description }, count)
        .await
        .context("Failed to seed todos")?;

    info!("Inserted {} todos", inserted);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
