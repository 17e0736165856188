use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use chainwatch_flow::api::{self, AppState};
use chainwatch_flow::config::Config;
use chainwatch_flow::pipeline::AnalysisPipeline;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Initialize structured logging (set RUST_LOG=debug for per-rule output)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    tracing::info!("ChainWatch Flow starting");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path)?;
    tracing::info!(
        large_tx_threshold = config.anomaly_detection.large_tx_threshold,
        time_threshold_secs = config.anomaly_detection.time_threshold_secs,
        "Configuration loaded from {}",
        config_path
    );

    // Blacklist (config + watchlist + sentinel) and anomaly engine
    let pipeline = AnalysisPipeline::init(&config)?;
    let state = AppState::new(pipeline, &config);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received");
        signal.cancel();
    });

    api::serve(state, &config.api.host, config.api.port, shutdown).await?;

    tracing::info!("ChainWatch Flow stopped gracefully");
    Ok(())
}
