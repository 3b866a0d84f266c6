//! Router, shared state and handlers.

use crate::config::{AnalysisConfig, Config};
use crate::error::DashboardError;
use crate::models::ApiResponse;
use crate::service::{self, DataSources, Domain};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Read-only state shared by every handler.
pub struct AppState {
    pub sources: DataSources,
    pub analysis: AnalysisConfig,
    pub cache_control: HeaderValue,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_control = HeaderValue::from_str(&config.server.cache_control())
            .context("Invalid Cache-Control value")?;

        Ok(Self {
            sources: DataSources::new(&config.data),
            analysis: config.analysis.clone(),
            cache_control,
        })
    }
}

/// Build the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/geographic", get(geographic))
        .route("/api/entity", get(entity))
        .route("/api/classification", get(classification))
        .route("/api/timeline", get(timeline))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/geographic
async fn geographic(State(state): State<Arc<AppState>>) -> Response {
    respond(Domain::Geographic, state, |s| service::geographic(&s.sources)).await
}

/// GET /api/entity
async fn entity(State(state): State<Arc<AppState>>) -> Response {
    respond(Domain::Entity, state, |s| service::entity(&s.sources)).await
}

/// GET /api/classification
async fn classification(State(state): State<Arc<AppState>>) -> Response {
    respond(Domain::Classification, state, |s| {
        service::classification(&s.sources, &s.analysis)
    })
    .await
}

/// GET /api/timeline
async fn timeline(State(state): State<Arc<AppState>>) -> Response {
    respond(Domain::Timeline, state, |s| {
        service::timeline(&s.sources, &s.analysis)
    })
    .await
}

/// Run a domain build on the blocking pool and wrap it in the envelope.
async fn respond<T, F>(domain: Domain, state: Arc<AppState>, build: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(&AppState) -> Result<T, DashboardError> + Send + 'static,
{
    let cache_control = state.cache_control.clone();
    let outcome = tokio::task::spawn_blocking(move || build(&state)).await;

    match outcome {
        Ok(Ok(data)) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, cache_control)],
            Json(ApiResponse::success(data)),
        )
            .into_response(),
        Ok(Err(e)) => {
            error!("{} request failed: {}", domain, e);
            failure(e.to_string())
        }
        Err(e) => {
            error!("{} worker task failed: {}", domain, e);
            failure(format!("Failed to build {} data", domain))
        }
    }
}

fn failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server<S>(config: &Config, shutdown: S) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::from_config(config)?);
    let app = create_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    for domain in Domain::ALL {
        info!("  GET /api/{}", domain);
    }
    info!("  GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    Ok(())
}
