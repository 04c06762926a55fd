use crate::server::AppState;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(code: StatusCode, message: &str) -> (StatusCode, Json<Self>) {
        (
            code,
            Json(Self {
                error: message.to_string(),
                code: code.as_u16(),
            }),
        )
    }
}

/// Common layers: tracing, wide-open CORS (the exporter is scraped
/// cross-origin by dashboards), compression.
pub fn apply(router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new()),
    )
}

/// Request timing middleware
pub async fn request_timing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}
