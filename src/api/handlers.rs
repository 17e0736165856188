use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use crate::error::{AnalysisError, GraphError};
use crate::export;
use crate::graph::bfs::parse_hop_limit;
use crate::graph::types::TxGraph;
use crate::ingest::filter::filter_transactions;
use crate::ingest::types::is_valid_address;
use crate::pipeline::AnalysisReport;

use super::types::*;
use super::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: msg.into(),
        }),
    )
}

fn bad_request(err: impl std::error::Error) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, err.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        blacklist_size: state.pipeline.blacklist.len(),
    })
}

// ============================================================
// Ingest
// ============================================================

pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> ApiResult<IngestResponse> {
    let address = req.address.trim();
    if !is_valid_address(address) {
        return Err(bad_request(AnalysisError::InvalidAddress(address.to_string())));
    }

    let transactions = filter_transactions(
        &req.transactions,
        address,
        &req.filter,
        req.usd_price,
        state.decimals,
    );
    Ok(Json(IngestResponse {
        count: transactions.len(),
        transactions,
    }))
}

// ============================================================
// Analysis
// ============================================================

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<AnalysisReport> {
    state
        .pipeline
        .analyze(&req.transactions, &req.address)
        .map(Json)
        .map_err(bad_request)
}

pub async fn anomalies(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnomaliesRequest>,
) -> Json<AnomaliesResponse> {
    let anomalies = state.pipeline.anomaly_engine.analyze_with(
        &req.transactions,
        &state.pipeline.blacklist,
        req.large_tx_threshold,
        req.time_threshold_secs,
    );
    Json(AnomaliesResponse {
        count: anomalies.len(),
        anomalies,
    })
}

// ============================================================
// Graph
// ============================================================

pub async fn graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Json<TxGraph> {
    Json(state.pipeline.graph(&req.transactions))
}

pub async fn graph_nhop(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HopParams>,
    Json(req): Json<SubgraphRequest>,
) -> ApiResult<TxGraph> {
    let address = req.address.unwrap_or_default();
    if address.trim().is_empty() {
        return Err(bad_request(GraphError::MissingStartAddress));
    }
    if req.transactions.is_empty() {
        return Err(bad_request(AnalysisError::NoTransactions));
    }

    let hop = match params.hop.as_deref() {
        Some(raw) => parse_hop_limit(Some(raw)),
        None => state.graph.default_hop_limit,
    }
    .min(state.graph.max_hop_limit);

    state
        .pipeline
        .subgraph(&req.transactions, &address, hop)
        .map(Json)
        .map_err(bad_request)
}

// ============================================================
// Export
// ============================================================

pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
    Json(req): Json<BatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.transactions.is_empty() {
        return Err(bad_request(AnalysisError::NoTransactions));
    }

    let rendered = match params.kind {
        ExportKind::Transactions => export::csv::write_transactions(&req.transactions),
        ExportKind::Anomalies => {
            let anomalies = state
                .pipeline
                .anomaly_engine
                .analyze_batch(&req.transactions, &state.pipeline.blacklist);
            export::csv::write_anomalies(&anomalies)
        }
    };
    let body = rendered.map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let disposition = format!("attachment; filename={}.csv", params.kind.file_stem());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
