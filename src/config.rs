use serde::Deserialize;

/// Env var holding a JSON array of extra blacklisted addresses.
pub const BLACKLIST_ENV_VAR: &str = "BLACKLISTED_WALLETS";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub anomaly_detection: AnomalyDetectionConfig,
    #[serde(default)]
    pub blacklist: BlacklistConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

// ============================================================
// Anomaly Detection Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct AnomalyDetectionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_large_tx_threshold")]
    pub large_tx_threshold: f64,
    #[serde(default = "default_time_threshold_secs")]
    pub time_threshold_secs: i64,
}

impl Default for AnomalyDetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            large_tx_threshold: default_large_tx_threshold(),
            time_threshold_secs: default_time_threshold_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_large_tx_threshold() -> f64 {
    1000.0
}

fn default_time_threshold_secs() -> i64 {
    600
}

// ============================================================
// Blacklist Config
// ============================================================

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BlacklistConfig {
    #[serde(default)]
    pub addresses: Vec<String>,
    /// CSV file with an `address` column (e.g. an OFAC SDN extract).
    pub watchlist_path: Option<String>,
}

// ============================================================
// Ingest & Graph Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
        }
    }
}

fn default_decimals() -> u32 {
    18
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphConfig {
    #[serde(default = "default_hop_limit")]
    pub default_hop_limit: usize,
    #[serde(default = "default_max_hop_limit")]
    pub max_hop_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_hop_limit: default_hop_limit(),
            max_hop_limit: default_max_hop_limit(),
        }
    }
}

fn default_hop_limit() -> usize {
    1
}

fn default_max_hop_limit() -> usize {
    6
}

// ============================================================
// API Config
// ============================================================

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_api_host")]
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
            host: default_api_host(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

impl Config {
    pub fn load(path: &str) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read config file '{}': {}", path, e))?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| eyre::eyre!("Failed to parse config file '{}': {}", path, e))?;
        config.merge_blacklist_env(std::env::var(BLACKLIST_ENV_VAR).ok().as_deref())?;
        config.validate()?;
        Ok(config)
    }

    /// Append addresses from a JSON array (the `BLACKLISTED_WALLETS` format).
    pub fn merge_blacklist_env(&mut self, raw: Option<&str>) -> eyre::Result<()> {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Ok(());
        };
        let extra: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| eyre::eyre!("{} must be a JSON array of strings: {}", BLACKLIST_ENV_VAR, e))?;
        tracing::debug!(count = extra.len(), "Blacklist addresses from environment");
        self.blacklist.addresses.extend(extra);
        Ok(())
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.anomaly_detection.time_threshold_secs < 0 {
            return Err(eyre::eyre!(
                "time_threshold_secs must be non-negative, got {}",
                self.anomaly_detection.time_threshold_secs
            ));
        }
        if self.ingest.decimals > 36 {
            return Err(eyre::eyre!(
                "decimals must be at most 36, got {}",
                self.ingest.decimals
            ));
        }
        if self.graph.default_hop_limit == 0 {
            return Err(eyre::eyre!("default_hop_limit must be at least 1"));
        }
        if self.graph.max_hop_limit < self.graph.default_hop_limit {
            return Err(eyre::eyre!(
                "max_hop_limit ({}) must not be below default_hop_limit ({})",
                self.graph.max_hop_limit,
                self.graph.default_hop_limit
            ));
        }
        Ok(())
    }
}
