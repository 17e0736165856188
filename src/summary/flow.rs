use serde::Serialize;

use crate::ingest::filter::round2;
use crate::ingest::types::{Transaction, WalletAddress};

/// One leg of the focal wallet's flow; `counterparty` keeps original casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEntry {
    pub hash: String,
    pub counterparty: String,
    pub value: f64,
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowSummary {
    pub total_in: f64,
    pub total_out: f64,
    pub count_in: usize,
    pub count_out: usize,
    pub flow_in: Vec<FlowEntry>,
    pub flow_out: Vec<FlowEntry>,
}

/// Split a batch into inflow and outflow for `wallet`.
///
/// A self-transfer counts as inflow only. Transactions touching neither side
/// are ignored.
pub fn analyze_transactions(transactions: &[Transaction], wallet: &str) -> FlowSummary {
    let wallet = WalletAddress::new(wallet);
    let mut summary = FlowSummary::default();

    for tx in transactions {
        if tx.to == wallet {
            summary.flow_in.push(FlowEntry {
                hash: tx.hash.clone(),
                counterparty: tx.from.raw().to_string(),
                value: tx.value,
                time: tx.time.clone(),
            });
        } else if tx.from == wallet {
            summary.flow_out.push(FlowEntry {
                hash: tx.hash.clone(),
                counterparty: tx.to.raw().to_string(),
                value: tx.value,
                time: tx.time.clone(),
            });
        }
    }

    summary.total_in = round2(summary.flow_in.iter().map(|e| e.value).sum());
    summary.total_out = round2(summary.flow_out.iter().map(|e| e.value).sum());
    summary.count_in = summary.flow_in.len();
    summary.count_out = summary.flow_out.len();

    tracing::debug!(
        wallet = %wallet,
        total_in = summary.total_in,
        total_out = summary.total_out,
        count_in = summary.count_in,
        count_out = summary.count_out,
        "Flow summary"
    );
    summary
}
