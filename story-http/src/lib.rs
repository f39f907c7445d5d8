pub mod apis;
pub mod logger;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use storyteller_core::{Storyteller, EXPORT_FILENAME};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub address: String,
    /// Where the download button writes the story
    pub export_file: PathBuf,
}

impl ServerConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            export_file: PathBuf::from(EXPORT_FILENAME),
        }
    }

    pub fn with_export_file(mut self, export_file: impl Into<PathBuf>) -> Self {
        self.export_file = export_file.into();
        self
    }
}

/// State shared by every handler
#[derive(Clone)]
pub struct ServerState {
    pub storyteller: Arc<Storyteller>,
    pub export_file: Arc<PathBuf>,
}

impl ServerState {
    pub fn new(storyteller: Storyteller, export_file: impl Into<PathBuf>) -> Self {
        Self {
            storyteller: Arc::new(storyteller),
            export_file: Arc::new(export_file.into()),
        }
    }
}

/// JSON error body returned by every endpoint
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let kind = if self.status.is_client_error() { "invalid_request_error" } else { "server_error" };
        let body = json!({
            "error": {
                "message": self.message,
                "type": kind,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// `Json` extractor whose rejections are rendered as [`ErrorResponse`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorResponse))]
pub struct ApiJson<T>(pub T);

pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(apis::form::handle_form))
        .route("/health", get(|| async { "ok" }))
        .route("/v1/story", post(apis::story::handle_generate_story))
        .route("/v1/download", post(apis::download::handle_download))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the form until the process is terminated
pub async fn start_server(config: ServerConfig, storyteller: Storyteller) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .address
        .parse()
        .with_context(|| format!("invalid bind address {}", config.address))?;

    info!(
        "story generation on {} model={} export={}",
        storyteller.provider_name(),
        storyteller.model(),
        config.export_file.display()
    );
    let state = ServerState::new(storyteller, config.export_file);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
