use serde::{Deserialize, Serialize};

use crate::anomaly::types::AnomalyRecord;
use crate::ingest::filter::TxFilter;
use crate::ingest::types::{RawExplorerTx, Transaction};

// ============================================================
// Query params
// ============================================================

/// `hop` stays text so that bad input degrades to one hop instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct HopParams {
    pub hop: Option<String>,
}

/// `?kind=anomalies` exports the batch's anomaly records instead of the batch.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub kind: ExportKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    #[default]
    Transactions,
    Anomalies,
}

impl ExportKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Anomalies => "anomalies",
        }
    }
}

// ============================================================
// Request bodies
// ============================================================

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub address: String,
    #[serde(default)]
    pub transactions: Vec<RawExplorerTx>,
    #[serde(default)]
    pub filter: TxFilter,
    #[serde(default = "default_usd_price")]
    pub usd_price: f64,
}

fn default_usd_price() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub struct AnomaliesRequest {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub large_tx_threshold: Option<f64>,
    pub time_threshold_secs: Option<i64>,
}

/// Body for the full-batch graph and CSV export.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub struct SubgraphRequest {
    pub address: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

// ============================================================
// Responses
// ============================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub blacklist_size: usize,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub count: usize,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct AnomaliesResponse {
    pub count: usize,
    pub anomalies: Vec<AnomalyRecord>,
}
