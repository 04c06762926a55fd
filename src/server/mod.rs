mod app_state;
pub mod middleware;
mod routes;
mod shutdown;

pub use app_state::AppState;

use crate::config::Config;
use anyhow::Result;
use axum::{middleware as axum_mw, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    let state = AppState::new(config.clone())?;

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.bind.parse()?, config.server.port);

    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, "Exporter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn create_router(state: Arc<AppState>) -> Router {
    let router = routes::router().layer(axum_mw::from_fn(middleware::request_timing));

    middleware::apply(router).with_state(state)
}
