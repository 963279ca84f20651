use askllm_core::{Bridge, BridgeConfig, ConfigOverrides};
use clap::Parser;
use colored::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod output;

use crate::cli::Args;
use crate::output::print_usage_instructions;

/// Main function - Loads configuration and answers questions from the terminal
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Logs go to stderr so answers on stdout stay clean
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !args.interactive && args.prompt.is_none() {
        // No prompt and not interactive, show usage
        print_usage_instructions();
        return Ok(());
    }

    let overrides = ConfigOverrides {
        provider: args.provider,
        api_key: args.api_key,
        model: args.model,
        endpoint: args.endpoint,
    };

    // Fail before reading any input if the upstream cannot be configured
    let bridge = match BridgeConfig::load(args.config.as_deref(), &overrides)
        .and_then(Bridge::from_config)
    {
        Ok(bridge) => bridge,
        Err(e) => {
            error!(error = %e, "Failed to initialize");
            eprintln!("{}", format!("{}", e).red());
            std::process::exit(2);
        }
    };
    info!(model = bridge.model_name(), "Ready");

    if args.interactive {
        crate::app::run_interactive_chat(&bridge).await?;
    } else if let Some(prompt) = args.prompt {
        crate::app::run_single_query(&prompt, &bridge).await?;
    }

    Ok(())
}
