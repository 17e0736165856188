use chrono::NaiveDateTime;

use crate::config::AnomalyDetectionConfig;
use crate::entity::blacklist::Blacklist;
use crate::ingest::types::{parse_time, Transaction};

use super::rules::{self, TimedTransaction};
use super::types::AnomalyRecord;

/// Run all three rules over a batch.
///
/// Large-transaction and blacklist records follow batch order; pass-through
/// records follow time order. Only temporally adjacent pairs are compared
/// for pass-through, so an unrelated transaction landing between an inflow
/// and its outflow hides the hop.
pub fn detect_anomalies(
    transactions: &[Transaction],
    blacklist: &Blacklist,
    large_tx_threshold: f64,
    time_threshold_secs: i64,
) -> Vec<AnomalyRecord> {
    let mut anomalies = Vec::new();

    // Rule 1: Large transaction
    anomalies.extend(
        transactions
            .iter()
            .filter_map(|tx| rules::check_large_transaction(tx, large_tx_threshold)),
    );

    // Rule 2: Blacklisted wallet on either side
    for tx in transactions {
        anomalies.extend(rules::check_blacklisted_wallet(tx, blacklist));
    }

    // Rule 3: Rapid pass-through over the time-sorted batch (stable sort)
    let mut timed = with_parsed_times(transactions);
    timed.sort_by_key(|t| t.at);
    for pair in timed.windows(2) {
        if let Some(anomaly) =
            rules::check_rapid_pass_through(&pair[0], &pair[1], time_threshold_secs)
        {
            anomalies.push(anomaly);
        }
    }

    tracing::debug!(
        transactions = transactions.len(),
        anomalies = anomalies.len(),
        "Anomaly detection complete"
    );
    anomalies
}

/// Unparseable timestamps sort first as `NaiveDateTime::MIN`.
fn with_parsed_times(transactions: &[Transaction]) -> Vec<TimedTransaction<'_>> {
    transactions
        .iter()
        .map(|tx| {
            let at = parse_time(&tx.time).unwrap_or_else(|| {
                tracing::warn!(
                    tx_hash = %tx.hash,
                    time = %tx.time,
                    "Unparseable transaction time, treating as earliest"
                );
                NaiveDateTime::MIN
            });
            TimedTransaction { tx, at }
        })
        .collect()
}

/// The anomaly detection engine. Runs the configured rules against a batch.
#[derive(Debug, Clone)]
pub struct AnomalyEngine {
    config: AnomalyDetectionConfig,
}

impl AnomalyEngine {
    pub fn new(config: AnomalyDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyDetectionConfig {
        &self.config
    }

    /// Analyze a batch with the configured thresholds.
    pub fn analyze_batch(
        &self,
        transactions: &[Transaction],
        blacklist: &Blacklist,
    ) -> Vec<AnomalyRecord> {
        self.analyze_with(transactions, blacklist, None, None)
    }

    /// Analyze a batch, optionally overriding either threshold for this call.
    pub fn analyze_with(
        &self,
        transactions: &[Transaction],
        blacklist: &Blacklist,
        large_tx_threshold: Option<f64>,
        time_threshold_secs: Option<i64>,
    ) -> Vec<AnomalyRecord> {
        if !self.config.enabled {
            return Vec::new();
        }

        detect_anomalies(
            transactions,
            blacklist,
            large_tx_threshold.unwrap_or(self.config.large_tx_threshold),
            time_threshold_secs.unwrap_or(self.config.time_threshold_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::types::AnomalyType;

    fn tx(hash: &str, from: &str, to: &str, value: f64, time: &str) -> Transaction {
        Transaction::new(hash, from, to, value, time)
    }

    fn expected(
        anomaly_type: AnomalyType,
        hash: &str,
        value: &str,
        time: &str,
        address: Option<&str>,
    ) -> AnomalyRecord {
        AnomalyRecord {
            anomaly_type,
            hash: hash.to_string(),
            value: value.to_string(),
            time: time.to_string(),
            address: address.map(str::to_string),
        }
    }

    /// Multiset comparison: same length and every expected record present.
    fn assert_same_records(result: &[AnomalyRecord], expected: &[AnomalyRecord]) {
        assert_eq!(result.len(), expected.len(), "got {:?}", result);
        for record in expected {
            let want = expected.iter().filter(|r| *r == record).count();
            let got = result.iter().filter(|r| *r == record).count();
            assert_eq!(got, want, "record {:?} in {:?}", record, result);
        }
    }

    #[test]
    fn test_detect_mixed_batch() {
        let txs = vec![
            tx("0x1", "0xfrom1", "0xto1", 500.0, "2021-01-01 00:00:00"),
            tx("0x2", "0xto1", "0xto2", 2000.0, "2021-01-01 00:10:00"),
            tx("0x3", "0xto2", "0xfrom2", 300.0, "2021-01-01 01:00:00"),
            tx("0x4", "0xblacklisted", "0xto3", 100.0, "2021-01-01 02:00:00"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600);
        assert_same_records(
            &result,
            &[
                expected(AnomalyType::LargeTransaction, "0x2", "2000.00", "2021-01-01 00:10:00", None),
                expected(AnomalyType::RapidPassThrough, "0x2", "2000.00", "2021-01-01 00:10:00", None),
                expected(
                    AnomalyType::BlacklistedWallet,
                    "0x4",
                    "100.00",
                    "2021-01-01 02:00:00",
                    Some("0xblacklisted"),
                ),
            ],
        );
    }

    #[test]
    fn test_detect_blacklisted_wallets() {
        let txs = vec![
            tx("0x1", "0xfrom1", "0xblacklisted", 5.0, "2021-01-01 00:00:00"),
            tx("0x2", "0xfrom2", "0xto2", 3.0, "2021-01-01 01:00:00"),
            tx("0x3", "0xblacklisted", "0xto3", 2.0, "2021-01-01 02:00:00"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600);
        assert_same_records(
            &result,
            &[
                expected(
                    AnomalyType::BlacklistedWallet,
                    "0x1",
                    "5.00",
                    "2021-01-01 00:00:00",
                    Some("0xblacklisted"),
                ),
                expected(
                    AnomalyType::BlacklistedWallet,
                    "0x3",
                    "2.00",
                    "2021-01-01 02:00:00",
                    Some("0xblacklisted"),
                ),
            ],
        );
    }

    #[test]
    fn test_blacklist_is_symmetric_and_keeps_casing() {
        let blacklist = Blacklist::new(["0xbad2"]);
        let txs = vec![tx("0x1", "0xBlacklisted", "0xBAD2", 1.0, "2021-01-01 00:00:00")];
        let result = detect_anomalies(&txs, &blacklist, 1000.0, 600);
        assert_same_records(
            &result,
            &[
                expected(
                    AnomalyType::BlacklistedWallet,
                    "0x1",
                    "1.00",
                    "2021-01-01 00:00:00",
                    Some("0xBlacklisted"),
                ),
                expected(
                    AnomalyType::BlacklistedWallet,
                    "0x1",
                    "1.00",
                    "2021-01-01 00:00:00",
                    Some("0xBAD2"),
                ),
            ],
        );
    }

    #[test]
    fn test_detect_quick_in_out() {
        let txs = vec![
            tx("0x1", "0xfrom1", "0xto1", 5.0, "2021-01-01 00:00:00"),
            tx("0x2", "0xto1", "0xto2", 3.0, "2021-01-01 00:10:00"),
            tx("0x3", "0xto2", "0xfrom2", 2.0, "2021-01-01 01:00:00"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600);
        assert_same_records(
            &result,
            &[expected(AnomalyType::RapidPassThrough, "0x2", "3.00", "2021-01-01 00:10:00", None)],
        );
    }

    #[test]
    fn test_rapid_boundary_plus_one_excluded() {
        let txs = vec![
            tx("0x1", "0xa", "0xb", 1.0, "2021-01-01 00:00:00"),
            tx("0x2", "0xb", "0xc", 1.0, "2021-01-01 00:10:01"),
        ];
        assert!(detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600).is_empty());
        assert_eq!(detect_anomalies(&txs, &Blacklist::default(), 1000.0, 601).len(), 1);
    }

    #[test]
    fn test_rapid_uses_time_order_not_batch_order() {
        let txs = vec![
            tx("0x2", "0xB", "0xc", 1.0, "2021-01-01 00:05:00"),
            tx("0x1", "0xa", "0xb", 1.0, "2021-01-01 00:00:00"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600);
        assert_same_records(
            &result,
            &[expected(AnomalyType::RapidPassThrough, "0x2", "1.00", "2021-01-01 00:05:00", None)],
        );
    }

    #[test]
    fn test_rapid_equal_times_keep_batch_order() {
        let outflow = tx("0x2", "0xb", "0xc", 1.0, "2021-01-01 00:00:00");
        let inflow = tx("0x1", "0xa", "0xb", 1.0, "2021-01-01 00:00:00");

        // Tied times stay in batch order: outflow then inflow is not a hop.
        let reversed = vec![outflow.clone(), inflow.clone()];
        assert!(detect_anomalies(&reversed, &Blacklist::default(), 1000.0, 600).is_empty());

        let ordered = vec![inflow, outflow];
        let result = detect_anomalies(&ordered, &Blacklist::default(), 1000.0, 600);
        assert_same_records(
            &result,
            &[expected(AnomalyType::RapidPassThrough, "0x2", "1.00", "2021-01-01 00:00:00", None)],
        );
    }

    #[test]
    fn test_rapid_only_inspects_adjacent_pairs() {
        // The unrelated 0x9 sits between the inflow and the outflow.
        let txs = vec![
            tx("0x1", "0xa", "0xb", 1.0, "2021-01-01 00:00:00"),
            tx("0x9", "0xx", "0xy", 1.0, "2021-01-01 00:01:00"),
            tx("0x2", "0xb", "0xc", 1.0, "2021-01-01 00:02:00"),
        ];
        assert!(detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600).is_empty());
    }

    #[test]
    fn test_detect_large_transactions() {
        let txs = vec![
            tx("0x1", "0xfrom1", "0xto1", 5.0, "2021-01-01 00:00:00"),
            tx("0x2", "0xfrom2", "0xto2", 15.0, "2021-01-01 01:00:00"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 10.0, 600);
        assert_same_records(
            &result,
            &[expected(AnomalyType::LargeTransaction, "0x2", "15.00", "2021-01-01 01:00:00", None)],
        );
    }

    #[test]
    fn test_detect_empty() {
        assert!(detect_anomalies(&[], &Blacklist::default(), 1000.0, 600).is_empty());
    }

    #[test]
    fn test_detect_extreme_values() {
        let txs = vec![
            tx("0x1", "0xfrom1", "0xto1", 1e12, "2021-01-01 00:00:00"),
            tx("0x2", "0xto1", "0xto2", -100.0, "2021-01-01 00:10:00"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 1e6, 600);
        assert_same_records(
            &result,
            &[
                expected(
                    AnomalyType::LargeTransaction,
                    "0x1",
                    "1000000000000.00",
                    "2021-01-01 00:00:00",
                    None,
                ),
                expected(AnomalyType::RapidPassThrough, "0x2", "-100.00", "2021-01-01 00:10:00", None),
            ],
        );
    }

    #[test]
    fn test_bad_time_sorts_first_without_failing() {
        let txs = vec![
            tx("0x2", "0xb", "0xc", 1.0, "2021-01-01 00:00:00"),
            tx("0x1", "0xa", "0xb", 1.0, "yesterday"),
        ];
        // 0x1 sorts first but the gap to 0x2 is far beyond the window.
        assert!(detect_anomalies(&txs, &Blacklist::default(), 1000.0, 600).is_empty());
        // Callers still see their original time text.
        assert_eq!(txs[1].time, "yesterday");
    }

    #[test]
    fn test_two_bad_times_compare_equal() {
        let txs = vec![
            tx("0x1", "0xa", "0xb", 1.0, ""),
            tx("0x2", "0xb", "0xc", 1.0, "not a time"),
        ];
        let result = detect_anomalies(&txs, &Blacklist::default(), 1000.0, 0);
        assert_same_records(
            &result,
            &[expected(AnomalyType::RapidPassThrough, "0x2", "1.00", "not a time", None)],
        );
    }

    #[test]
    fn test_engine_overrides_and_disable() {
        let txs = vec![tx("0x1", "0xa", "0xb", 50.0, "2021-01-01 00:00:00")];
        let engine = AnomalyEngine::new(AnomalyDetectionConfig::default());
        assert!(engine.analyze_batch(&txs, &Blacklist::default()).is_empty());
        assert_eq!(
            engine
                .analyze_with(&txs, &Blacklist::default(), Some(10.0), None)
                .len(),
            1
        );

        let disabled = AnomalyEngine::new(AnomalyDetectionConfig {
            enabled: false,
            ..AnomalyDetectionConfig::default()
        });
        assert!(disabled
            .analyze_with(&txs, &Blacklist::default(), Some(10.0), None)
            .is_empty());
    }
}
