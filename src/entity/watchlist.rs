/// One row of a watchlist CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistEntry {
    pub address: String,
    pub label: Option<String>,
}

/// Parse a watchlist CSV file.
///
/// The file must have a header row with an `address` column; a `label` column
/// is optional and other columns are ignored, so OFAC SDN extracts with
/// `sdn_id,entity_name,program,address` load unchanged.
pub fn parse_watchlist_csv(path: &str) -> eyre::Result<Vec<WatchlistEntry>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("Failed to open watchlist CSV '{}': {}", path, e))?;
    parse_watchlist(reader, path)
}

fn parse_watchlist<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    source: &str,
) -> eyre::Result<Vec<WatchlistEntry>> {
    let headers = reader.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let address_col = find("address")
        .ok_or_else(|| eyre::eyre!("Watchlist '{}' has no 'address' column", source))?;
    let label_col = find("label").or_else(|| find("entity_name"));

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result?;
        let address = record.get(address_col).unwrap_or("").trim();

        if address.is_empty() || !address.starts_with("0x") {
            skipped += 1;
            continue;
        }

        let label = label_col
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        entries.push(WatchlistEntry {
            address: address.to_string(),
            label,
        });
    }

    tracing::info!(entries = entries.len(), skipped, source, "Parsed watchlist");
    Ok(entries)
}
