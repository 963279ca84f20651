use askllm_core::{Bridge, BridgeConfig, ConfigOverrides, Provider};
use askllm_web::http_server;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "askllm-web", about = "Browser front end for a hosted language model")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key for the upstream service
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Upstream schema: completions, chat or gemini
    #[arg(short, long)]
    provider: Option<Provider>,

    /// Model to use
    #[arg(short = 'o', long)]
    model: Option<String>,

    /// Upstream endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// HTTP server address
    #[arg(long, default_value = "127.0.0.1:8080")]
    http_addr: SocketAddr,

    /// Page title
    #[arg(long, default_value = "Ask the model")]
    title: String,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting askllm web shell");

    let overrides = ConfigOverrides {
        provider: args.provider,
        api_key: args.api_key,
        model: args.model,
        endpoint: args.endpoint,
    };

    let config = match BridgeConfig::load(args.config.as_deref(), &overrides) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    let bridge = match Bridge::from_config(config) {
        Ok(bridge) => {
            info!(model = bridge.model_name(), "Initialized upstream client");
            bridge
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize upstream client");
            return Err(anyhow::anyhow!("Failed to initialize upstream client: {}", e));
        }
    };

    http_server::run_server(bridge, &args.title, args.http_addr).await?;

    info!("askllm web shell shutting down");
    Ok(())
}
