//! Hyperliquid position watch bot - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Hyperliquid position watch bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via HLWATCH_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    hlwatch_bot::logging::init_logging();

    info!("Starting hlwatch v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > HLWATCH_CONFIG env var > default
    let config = match args
        .config
        .or_else(|| std::env::var("HLWATCH_CONFIG").ok())
    {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            hlwatch_bot::AppConfig::from_file(&path)?
        }
        None => hlwatch_bot::AppConfig::load()?,
    };
    info!(info_url = %config.info_url, "Configuration loaded");

    let app = hlwatch_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
