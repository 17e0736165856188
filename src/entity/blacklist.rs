use std::collections::HashSet;

use crate::config::BlacklistConfig;
use crate::ingest::types::WalletAddress;

use super::watchlist;

/// Test address that is always blacklisted, whatever the configuration says.
pub const SENTINEL_ADDRESS: &str = "0xblacklisted";

/// Immutable set of blacklisted addresses, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blacklist {
    addresses: HashSet<String>,
}

impl Blacklist {
    /// Build a blacklist from `addresses` plus the sentinel. Duplicates and
    /// case variants collapse; blank entries are dropped.
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: HashSet<String> = addresses
            .into_iter()
            .map(|a| a.as_ref().trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        set.insert(SENTINEL_ADDRESS.to_string());
        Self { addresses: set }
    }

    /// Merge configured addresses with the optional watchlist file.
    pub fn from_config(config: &BlacklistConfig) -> eyre::Result<Self> {
        let mut addresses = config.addresses.clone();

        if let Some(path) = &config.watchlist_path {
            let entries = watchlist::parse_watchlist_csv(path)?;
            addresses.extend(entries.into_iter().map(|e| e.address));
        }

        let blacklist = Self::new(addresses);
        tracing::info!(addresses = blacklist.len(), "Loaded blacklist");
        Ok(blacklist)
    }

    pub fn contains(&self, address: &WalletAddress) -> bool {
        self.addresses.contains(address.as_str())
    }

    /// Lookup for text that may not be canonical yet.
    pub fn contains_str(&self, address: &str) -> bool {
        self.addresses.contains(&address.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}
