use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout shared by ingestion, detection and export.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder used for a missing address or timestamp.
pub const UNKNOWN: &str = "unknown";

/// A wallet address, canonicalized once on construction.
///
/// Identity (equality, hashing, blacklist lookups) uses the lowercase form;
/// the original casing is kept for display in anomaly records.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct WalletAddress {
    raw: String,
    canonical: String,
}

impl WalletAddress {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Self::unknown();
        }
        Self {
            raw: trimmed.to_string(),
            canonical: trimmed.to_lowercase(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            raw: UNKNOWN.to_string(),
            canonical: UNKNOWN.to_string(),
        }
    }

    /// Lowercase identity.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Address as it was supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_unknown(&self) -> bool {
        self.canonical == UNKNOWN
    }
}

impl Default for WalletAddress {
    fn default() -> Self {
        Self::unknown()
    }
}

impl PartialEq for WalletAddress {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Hash for WalletAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl From<Option<String>> for WalletAddress {
    fn from(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.raw
    }
}

/// USD value as received from upstream: usually a number, sometimes text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsdValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl UsdValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Other(_) => None,
        }
    }
}

/// A normalized transaction, ready for anomaly detection and graph building.
///
/// `value` is already in the chain's native unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    #[serde(default)]
    pub from: WalletAddress,
    #[serde(default)]
    pub to: WalletAddress,
    pub value: f64,
    #[serde(default)]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_value: Option<UsdValue>,
}

impl Transaction {
    pub fn new(
        hash: impl Into<String>,
        from: impl AsRef<str>,
        to: impl AsRef<str>,
        value: f64,
        time: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            from: WalletAddress::new(from),
            to: WalletAddress::new(to),
            value,
            time: time.into(),
            usd_value: None,
        }
    }

    pub fn with_usd_value(mut self, usd: f64) -> Self {
        self.usd_value = Some(UsdValue::Number(usd));
        self
    }

    pub fn is_self_transfer(&self) -> bool {
        self.from == self.to
    }

    /// Edge weight for graph views. Missing or non-numeric USD values weigh 0.0.
    pub fn usd_weight(&self) -> f64 {
        match &self.usd_value {
            None => 0.0,
            Some(usd) => usd.as_f64().unwrap_or_else(|| {
                tracing::warn!(
                    tx_hash = %self.hash,
                    usd_value = ?usd,
                    "Non-numeric usd_value, using 0.0"
                );
                0.0
            }),
        }
    }

    /// Timestamp text, or `"unknown"` when absent.
    pub fn time_label(&self) -> &str {
        if self.time.trim().is_empty() {
            UNKNOWN
        } else {
            &self.time
        }
    }
}

/// A record as returned by an Etherscan-style `txlist` endpoint.
/// `value` is in the smallest unit (wei), `timeStamp` is unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExplorerTx {
    pub hash: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: String,
}

pub fn parse_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIME_FORMAT).ok()
}

/// `0x` followed by 40 (account) or 64 (hash-length) hex characters.
pub fn is_valid_address(address: &str) -> bool {
    let Some(body) = address.trim().strip_prefix("0x") else {
        return false;
    };
    (body.len() == 40 || body.len() == 64) && hex::decode(body).is_ok()
}
