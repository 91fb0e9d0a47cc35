use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::util::ServiceExt;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod middleware;
mod routes;
mod services;

use services::{kv::SqliteKv, repository::Repository, store::Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketdesk_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env();

    // Initialize database
    let db = db::Database::connect(&config.database_url).await?;
    db.run_migrations().await?;

    let store = Store::new(Arc::new(SqliteKv::new(db)), config.storage_namespace.clone());
    if config.seed_on_start {
        store.initialize().await?;
    }

    // Build application state
    let state = AppState {
        repo: Repository::new(store),
        config: config.clone(),
    };

    let app = build_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::api_router(state.clone()))
        .fallback(serve_spa)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn serve_spa(State(state): State<AppState>, req: Request<Body>) -> Response {
    let static_dir = PathBuf::from(&state.config.static_dir);
    let path = req.uri().path().trim_start_matches('/');

    // Try to serve static file first
    if !path.is_empty() && static_dir.join(path).is_file() {
        return match ServeDir::new(&static_dir).oneshot(req).await {
            Ok(res) => res.into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to serve static file");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    // For SPA routes, serve index.html
    match tokio::fs::read(static_dir.join("index.html")).await {
        Ok(contents) => (
            StatusCode::OK,
            [("content-type", "text/html")],
            Body::from(contents),
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub config: config::Config,
}
