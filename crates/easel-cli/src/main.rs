use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use easel_engine::Painter;
use easel_server::{AppState, ServerConfig};

mod demo;

#[derive(Parser)]
#[command(
    name = "easel",
    about = "Canvas session server — drives a browser canvas from a server-side painter",
    version
)]
struct Cli {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("easel.json5"));
    let mut config = ServerConfig::load(&config_path)?;

    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::info!("Starting easel demo painter on {}:{}", config.host, config.port);

    let state = Arc::new(AppState::new(Box::new(|| {
        Box::new(demo::DemoPainter::new()) as Box<dyn Painter>
    })));

    easel_server::start_server(state, &config.host, config.port).await
}
