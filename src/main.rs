use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use car_price_estimator::api::CarPriceServer;
use car_price_estimator::config::Settings;
use car_price_estimator::ml::{PriceModel, Regressor};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "CARPRICE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the serialized price model
    #[arg(short, long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_model_override(cli.model);

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Car price estimator starting up...");

    let model: Arc<dyn Regressor> = Arc::new(
        PriceModel::load(&settings.model.path)
            .with_context(|| format!("Failed to load model from {}", settings.model.path.display()))?,
    );

    let server = CarPriceServer::new(settings.server, model);
    server.start().await
}
