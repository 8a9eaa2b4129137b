//! HTTP feed server.
//!
//! `GET /api/videos` returns the enhanced dataset file as it is on disk,
//! re-reading it on every request. Everything else is served from the static
//! UI directory, with `/` mapped to `index.html`.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::de::IgnoredAny;
use serde_json::json;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub data_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: Arc::new(data_path.into()),
        }
    }
}

/// Build the router serving the API and the static UI.
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/api/videos", get(videos_handler))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `port` on all interfaces and serve until the process is stopped.
pub async fn start_http_server(state: AppState, public_dir: &Path, port: u16) -> std::io::Result<()> {
    let app = build_router(state, public_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://localhost:{}", port);

    axum::serve(listener, app).await
}

/// The dataset file's text, once it is known to parse as JSON.
async fn load_dataset(path: &Path) -> Result<String, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| e.to_string())?;
    serde_json::from_str::<IgnoredAny>(&text).map_err(|e| e.to_string())?;
    Ok(text)
}

/// Enhanced dataset handler; the body is the file as written, key order included.
async fn videos_handler(State(state): State<AppState>) -> Response {
    match load_dataset(&state.data_path).await {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(path = %state.data_path.display(), error = %e, "Error reading enhanced dataset");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to load video data"})),
            )
                .into_response()
        }
    }
}
