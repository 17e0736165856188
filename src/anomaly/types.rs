use serde::{Deserialize, Serialize};

/// Types of anomalies the engine can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    LargeTransaction,
    BlacklistedWallet,
    RapidPassThrough,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LargeTransaction => "large_transaction",
            Self::BlacklistedWallet => "blacklisted_wallet",
            Self::RapidPassThrough => "rapid_pass_through",
        }
    }
}

/// A flagged transaction. `value` is the native amount with two decimals;
/// `address` is only set for blacklist hits and keeps the original casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub hash: String,
    pub value: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
