//! Axum server: WebSocket upgrade, health, and bootstrap assets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use easel_engine::Painter;

use crate::assets::asset_router;
use crate::connection::handle_ws_connection;

/// Creates one painter per accepted connection.
pub trait PainterFactory: Send + Sync {
    fn create(&self) -> Box<dyn Painter>;
}

impl<F> PainterFactory for F
where
    F: Fn() -> Box<dyn Painter> + Send + Sync,
{
    fn create(&self) -> Box<dyn Painter> {
        self()
    }
}

/// Shared server state: the painter factory and connection accounting.
/// Sessions themselves are private to their connection tasks.
pub struct AppState {
    pub painters: Box<dyn PainterFactory>,
    connections: AtomicU64,
}

impl AppState {
    pub fn new(painters: Box<dyn PainterFactory>) -> Self {
        Self {
            painters,
            connections: AtomicU64::new(0),
        }
    }

    pub(crate) fn connection_opened(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn connection_closed(&self) {
        self.connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn open_connections(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }
}

/// Start the server and block until shutdown.
pub async fn start_server(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("easel listening on http://{addr}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `/ws` and `/health` are registered before the asset catch-all so they
/// take priority.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(asset_router())
        .layer(TraceLayer::new_for_http())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    axum::Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "connections": state.open_connections(),
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
