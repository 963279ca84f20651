use crate::page::Page;
use askllm_core::{Bridge, EMPTY_QUERY_MESSAGE};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    bridge: Bridge,
    page: Arc<Page>,
}

/// Form posted by the HTML page
#[derive(Deserialize)]
pub struct AskForm {
    #[serde(default)]
    query: String,
}

/// Request model for JSON queries
#[derive(Deserialize)]
pub struct QueryRequest {
    query: String,
}

/// Response model for JSON queries
#[derive(Serialize, Deserialize, Debug)]
pub struct QueryResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error type for HTTP server
#[derive(Debug)]
pub enum ApiError {
    InternalError(anyhow::Error),
}

impl From<minijinja::Error> for ApiError {
    fn from(e: minijinja::Error) -> Self {
        Self::InternalError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InternalError(e) => {
                error!(error = %e, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}

/// Build the router for `bridge`
pub fn router(bridge: Bridge, title: &str) -> anyhow::Result<Router> {
    let state = AppState {
        bridge,
        page: Arc::new(Page::new(title)?),
    };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/", get(index).post(submit))
        .route("/api/ask", post(handle_query))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state))
}

/// Start the HTTP server
pub async fn run_server(bridge: Bridge, title: &str, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(bridge, title)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    info!("Serving on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "askllm is running"
}

/// Blank page
async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let html = state.page.render(state.bridge.model_name(), "", None)?;
    Ok(Html(html))
}

/// Answers a form submission and re-renders the page with the answer
async fn submit(
    State(state): State<AppState>,
    Form(form): Form<AskForm>,
) -> Result<Html<String>, ApiError> {
    let answer = state.bridge.answer(&form.query).await;
    let html = state
        .page
        .render(state.bridge.model_name(), &form.query, Some(&answer))?;
    Ok(Html(html))
}

/// Handler for JSON query requests
async fn handle_query(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Json<QueryResponse> {
    if payload.query.trim().is_empty() {
        return Json(QueryResponse {
            response: String::new(),
            error: Some(EMPTY_QUERY_MESSAGE.to_string()),
        });
    }

    match state.bridge.try_answer(&payload.query).await {
        Ok(response) => Json(QueryResponse {
            response,
            error: None,
        }),
        Err(e) => Json(QueryResponse {
            response: String::new(),
            error: Some(e.user_message()),
        }),
    }
}
