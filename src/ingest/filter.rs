use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::types::{RawExplorerTx, Transaction, UsdValue, WalletAddress, TIME_FORMAT, UNKNOWN};

/// Which side of the focal wallet a transaction must touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    All,
    In,
    Out,
}

/// User-facing filter applied while normalizing explorer records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxFilter {
    #[serde(default)]
    pub min_value: f64,
    pub max_value: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub direction: Direction,
}

/// Normalize and filter raw explorer records for `address`.
///
/// Converts smallest-unit values to native units, formats timestamps as UTC
/// `TIME_FORMAT` text and prices each record at `usd_price`.
pub fn filter_transactions(
    raw: &[RawExplorerTx],
    address: &str,
    filter: &TxFilter,
    usd_price: f64,
    decimals: u32,
) -> Vec<Transaction> {
    let focal = WalletAddress::new(address);
    let mut kept = Vec::with_capacity(raw.len());

    for record in raw {
        let value = raw_to_native(&record.value, decimals);
        if value < filter.min_value {
            continue;
        }
        if filter.max_value.is_some_and(|max| value > max) {
            continue;
        }

        let timestamp = record
            .time_stamp
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        let has_date_bounds = filter.start_date.is_some() || filter.end_date.is_some();
        match timestamp {
            Some(ts) => {
                let date = ts.date_naive();
                if filter.start_date.is_some_and(|start| date < start) {
                    continue;
                }
                if filter.end_date.is_some_and(|end| date > end) {
                    continue;
                }
            }
            None if has_date_bounds => {
                tracing::debug!(
                    tx_hash = %record.hash,
                    "Dropping record with unparseable timestamp under a date filter"
                );
                continue;
            }
            None => {}
        }

        let from = WalletAddress::from(record.from.clone());
        let to = WalletAddress::from(record.to.clone());
        match filter.direction {
            Direction::In if to != focal => continue,
            Direction::Out if from != focal => continue,
            _ => {}
        }

        let time = timestamp
            .map(|ts| ts.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        kept.push(Transaction {
            hash: record.hash.clone(),
            from,
            to,
            value,
            time,
            usd_value: Some(UsdValue::Number(round2(value * usd_price))),
        });
    }

    tracing::info!(
        received = raw.len(),
        kept = kept.len(),
        address = %focal,
        "Filtered explorer records"
    );
    kept
}

/// Convert a smallest-unit integer string to the chain's native unit.
fn raw_to_native(raw: &str, decimals: u32) -> f64 {
    let amount = match BigDecimal::from_str(raw.trim()) {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(raw, error = %e, "Unparseable raw value, using 0");
            return 0.0;
        }
    };
    let Some(divisor) = 10u128.checked_pow(decimals).map(BigDecimal::from) else {
        tracing::warn!(decimals, "Unsupported decimals, using 0");
        return 0.0;
    };
    (amount / divisor).to_f64().unwrap_or(0.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
