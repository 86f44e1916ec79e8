//! HTTP server for the prediction API

use super::handler::{predict_handler, status_handler, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Base64 CSV payloads of large organisations exceed axum's 2 MB default
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/api/status", get(status_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server exposing the prediction API
pub struct HttpServer {
    state: Arc<AppState>,
    host: String,
    port: u16,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(state: Arc<AppState>) -> Self {
        let host = state.config.server.host.clone();
        let port = state.config.server.port;
        Self { state, host, port }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(Arc::clone(&self.state));

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Prediction API listening on http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
