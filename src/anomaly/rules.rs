use chrono::NaiveDateTime;

use crate::entity::blacklist::Blacklist;
use crate::ingest::types::{Transaction, WalletAddress};

use super::types::{AnomalyRecord, AnomalyType};

/// A transaction paired with its parsed timestamp for the duration of one
/// detection call.
#[derive(Debug, Clone, Copy)]
pub struct TimedTransaction<'a> {
    pub tx: &'a Transaction,
    pub at: NaiveDateTime,
}

/// Check if a transaction meets the large transaction threshold.
pub fn check_large_transaction(tx: &Transaction, threshold: f64) -> Option<AnomalyRecord> {
    if tx.value >= threshold {
        return Some(record(AnomalyType::LargeTransaction, tx, None));
    }
    None
}

/// Check both counterparties against the blacklist.
/// Emits one record per blacklisted side, `from` first.
pub fn check_blacklisted_wallet(tx: &Transaction, blacklist: &Blacklist) -> Vec<AnomalyRecord> {
    [&tx.from, &tx.to]
        .into_iter()
        .filter(|side| blacklist.contains(side))
        .map(|side: &WalletAddress| {
            record(AnomalyType::BlacklistedWallet, tx, Some(side.raw().to_string()))
        })
        .collect()
}

/// Check if `next` forwards what `prev` delivered within `window_secs`.
/// The window bound is inclusive.
pub fn check_rapid_pass_through(
    prev: &TimedTransaction<'_>,
    next: &TimedTransaction<'_>,
    window_secs: i64,
) -> Option<AnomalyRecord> {
    if prev.tx.to != next.tx.from {
        return None;
    }

    let elapsed = next.at.signed_duration_since(prev.at).num_seconds();
    if elapsed <= window_secs {
        tracing::debug!(
            via = %next.tx.from,
            incoming = %prev.tx.hash,
            outgoing = %next.tx.hash,
            elapsed,
            "Rapid pass-through"
        );
        return Some(record(AnomalyType::RapidPassThrough, next.tx, None));
    }

    None
}

pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

fn record(anomaly_type: AnomalyType, tx: &Transaction, address: Option<String>) -> AnomalyRecord {
    AnomalyRecord {
        anomaly_type,
        hash: tx.hash.clone(),
        value: format_value(tx.value),
        time: tx.time.clone(),
        address,
    }
}
