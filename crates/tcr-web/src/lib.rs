//! Browser-facing adapter (axum).
//!
//! `GET /ws` upgrades to the chat socket; every other path is a static file
//! from the public directory.

use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use tcr_core::relay::Relay;

pub mod ws;


/// Assemble the full Axum router.
pub fn build_router(relay: Arc<Relay>, public_dir: &Path) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(relay)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the listener fails.
pub async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
