use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::anomaly::engine::AnomalyEngine;
use crate::anomaly::types::{AnomalyRecord, AnomalyType};
use crate::config::Config;
use crate::entity::blacklist::Blacklist;
use crate::error::{AnalysisError, GraphError};
use crate::graph::bfs;
use crate::graph::builder;
use crate::graph::types::TxGraph;
use crate::ingest::types::Transaction;
use crate::summary::flow::{self, FlowSummary};

/// Result of analyzing one wallet's transaction batch.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub address: String,
    pub summary: FlowSummary,
    pub anomalies: Vec<AnomalyRecord>,
    /// Anomaly types per transaction hash, for per-row badges.
    pub anomaly_index: BTreeMap<String, Vec<AnomalyType>>,
}

/// Bundles the immutable blacklist with the anomaly engine so each call
/// gets the same configuration:
/// 1. Flow summary
/// 2. Anomaly detection
/// 3. Full-batch graph / n-hop subgraph on demand
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    pub blacklist: Arc<Blacklist>,
    pub anomaly_engine: AnomalyEngine,
}

impl AnalysisPipeline {
    /// Load the blacklist (config addresses + watchlist) and build the engine.
    pub fn init(config: &Config) -> eyre::Result<Self> {
        let blacklist = Blacklist::from_config(&config.blacklist)?;
        let anomaly_engine = AnomalyEngine::new(config.anomaly_detection.clone());
        Ok(Self::new(blacklist, anomaly_engine))
    }

    pub fn new(blacklist: Blacklist, anomaly_engine: AnomalyEngine) -> Self {
        Self {
            blacklist: Arc::new(blacklist),
            anomaly_engine,
        }
    }

    pub fn analyze(
        &self,
        transactions: &[Transaction],
        address: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        if address.trim().is_empty() {
            return Err(AnalysisError::MissingStartAddress);
        }
        if transactions.is_empty() {
            return Err(AnalysisError::NoTransactions);
        }

        let summary = flow::analyze_transactions(transactions, address);
        let anomalies = self.anomaly_engine.analyze_batch(transactions, &self.blacklist);

        let mut anomaly_index: BTreeMap<String, Vec<AnomalyType>> = BTreeMap::new();
        for anomaly in &anomalies {
            anomaly_index
                .entry(anomaly.hash.clone())
                .or_default()
                .push(anomaly.anomaly_type);
        }

        if !anomalies.is_empty() {
            tracing::warn!(
                address,
                anomalies = anomalies.len(),
                flagged_txs = anomaly_index.len(),
                "Anomalies detected"
            );
        }

        Ok(AnalysisReport {
            address: address.trim().to_string(),
            summary,
            anomalies,
            anomaly_index,
        })
    }

    pub fn graph(&self, transactions: &[Transaction]) -> TxGraph {
        builder::build_graph(transactions, &self.blacklist)
    }

    pub fn subgraph(
        &self,
        transactions: &[Transaction],
        start_address: &str,
        hop_limit: usize,
    ) -> Result<TxGraph, GraphError> {
        let hop_limit = i64::try_from(hop_limit).unwrap_or(i64::MAX);
        bfs::bfs_subgraph(transactions, start_address, hop_limit, &self.blacklist)
    }
}
