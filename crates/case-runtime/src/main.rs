//! # Case Runtime Binary
//!
//! Boots the evidence-chain runtime with validated configuration.

use anyhow::{Context, Result};
use case_runtime::{telemetry, EvidenceRuntime, RuntimeConfig};
use tracing::info;

fn load_config() -> Result<RuntimeConfig> {
    match std::env::var("EC_CONFIG") {
        Ok(path) => RuntimeConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config from {}", path)),
        Err(_) => Ok(RuntimeConfig::from_env()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    telemetry::init(&config.telemetry).context("Failed to initialize logging")?;

    config
        .validate_for_production()
        .context("Refusing to start with insecure configuration")?;

    let runtime = EvidenceRuntime::from_config(&config).context("Failed to wire subsystems")?;
    info!(
        fir_prefix = %config.identifiers.fir_prefix,
        case_prefix = %config.identifiers.case_prefix,
        "Case runtime is running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;

    info!(
        firs = runtime.store().chain().fir_count(),
        cases = runtime.store().chain().case_count(),
        "Shutting down"
    );
    Ok(())
}
