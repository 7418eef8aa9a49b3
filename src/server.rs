use std::net::SocketAddr;

use anyhow::Result;
use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;

/// Fixed acknowledgment; it does not reflect how the cycle ended.
const ACK_STATUS: &str = "cycle complete";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(trigger))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Trigger endpoint listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Runs one cycle synchronously, then acknowledges.
async fn trigger(State(state): State<AppState>) -> Json<serde_json::Value> {
    let outcome = state.orchestrator.run_cycle().await;
    info!(outcome = %outcome, "Triggered cycle finished");
    Json(serde_json::json!({ "status": ACK_STATUS }))
}
