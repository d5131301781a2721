use bioguard::config::ServerConfig;
use bioguard::transport::{self, Stores};
use colored::*;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "bioguard.properties";

fn main() {
    let log_level = std::env::var("BIOGUARD_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let runtime = tokio::runtime::Runtime::new().expect("failed to start async runtime");
    if let Err(e) = runtime.block_on(run(config_path)) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(config_path: String) -> anyhow::Result<()> {
    let config = ServerConfig::load(&config_path)?;
    let stores = Arc::new(Stores::from_config(&config)?);

    transport::serve(config, stores).await?;
    Ok(())
}
