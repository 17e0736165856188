use crate::anomaly::types::AnomalyRecord;
use crate::ingest::types::Transaction;

pub const TRANSACTION_HEADERS: [&str; 6] =
    ["hash", "from", "to", "value_native", "value_usd", "time"];
pub const ANOMALY_HEADERS: [&str; 5] = ["type", "hash", "value", "address", "time"];

/// Render transactions as CSV. Addresses keep their original casing; a
/// missing or non-numeric USD value leaves the cell empty.
pub fn write_transactions(transactions: &[Transaction]) -> eyre::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TRANSACTION_HEADERS)?;

    for tx in transactions {
        let usd = tx
            .usd_value
            .as_ref()
            .and_then(|v| v.as_f64())
            .map(|v| v.to_string())
            .unwrap_or_default();
        writer.write_record([
            tx.hash.as_str(),
            tx.from.raw(),
            tx.to.raw(),
            tx.value.to_string().as_str(),
            usd.as_str(),
            tx.time.as_str(),
        ])?;
    }

    finish(writer)
}

pub fn write_anomalies(anomalies: &[AnomalyRecord]) -> eyre::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ANOMALY_HEADERS)?;

    for anomaly in anomalies {
        writer.write_record([
            anomaly.anomaly_type.as_str(),
            anomaly.hash.as_str(),
            anomaly.value.as_str(),
            anomaly.address.as_deref().unwrap_or(""),
            anomaly.time.as_str(),
        ])?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> eyre::Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| eyre::eyre!("Failed to flush CSV writer: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
