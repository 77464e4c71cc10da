//! HTTP Server for the weather/sales dashboard
//! Loads the dimension tables, then serves the analytical views over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_sales::config::AppConfig;
use weather_sales::server::{serve, AppState};

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "Weather vs. sales analytics API for the dashboard")]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Directory holding the dimension and fact CSV files (overrides DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Country whose facts are aggregated (overrides FILTER_COUNTRY)
    #[arg(long)]
    country: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(country) = args.country {
        config.filter_country = country;
    }

    info!("Data directory: {}", config.data_dir.display());
    info!("Filter country: {}", config.filter_country);

    // No query is served until every dimension table has loaded.
    let load_config = config.clone();
    let state = tokio::task::spawn_blocking(move || AppState::load(load_config))
        .await
        .context("Dimension loading task failed")?
        .context("Failed to load dimension tables")?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    serve(listener, Arc::new(state)).await?;
    Ok(())
}
