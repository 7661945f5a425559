pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/validate", get(handlers::validate::validate_ticker))
        .route("/api/analyze", post(handlers::analyze::analyze))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    info!(%addr, "options-screener API listening");
    info!("  Health:   GET  http://{addr}/health");
    info!("  Validate: GET  http://{addr}/api/validate?ticker=AAPL");
    info!("  Analyze:  POST http://{addr}/api/analyze");

    axum::serve(listener, app).await.context("running server")?;

    Ok(())
}
