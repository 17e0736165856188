pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, GraphConfig};
use crate::pipeline::AnalysisPipeline;

#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: AnalysisPipeline,
    pub graph: GraphConfig,
    pub decimals: u32,
}

impl AppState {
    pub fn new(pipeline: AnalysisPipeline, config: &Config) -> Self {
        Self {
            pipeline,
            graph: config.graph.clone(),
            decimals: config.ingest.decimals,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/ingest", post(handlers::ingest))
        .route("/api/v1/analyze", post(handlers::analyze))
        .route("/api/v1/anomalies", post(handlers::anomalies))
        .route("/api/v1/graph", post(handlers::graph))
        .route("/api/v1/graph/nhop", post(handlers::graph_nhop))
        .route("/api/v1/export", post(handlers::export_csv))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the API until `shutdown` is cancelled.
pub async fn serve(
    state: AppState,
    host: &str,
    port: u16,
    shutdown: CancellationToken,
) -> eyre::Result<()> {
    let app = router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    tracing::info!("API server stopped");
    Ok(())
}
