use crate::server::middleware::ErrorResponse;
use crate::server::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

async fn root() -> &'static str {
    "hostpulse"
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// One scrape: collect from both sources, then render the snapshot. A failed
/// cycle becomes a 500 and the registry keeps its last good values.
async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    if let Err(e) = state.collector.scrape(&state.registry).await {
        error!(error = %e, "Scrape failed");
        return ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            .into_response();
    }

    match state.registry.lock().await.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed")
                .into_response()
        }
    }
}
