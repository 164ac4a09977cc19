use anyhow::Result;
use clap::Parser;

use sidecar::{logging, SidecarClient, SidecarConfig};

mod args;
mod demo;

use args::ClientArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ClientArgs::parse();

    let log_level = args.log_level.parse().unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Defaulting to 'info'.",
            args.log_level
        );
        tracing::Level::INFO
    });
    logging::setup_stdout_logging(&log_level)?;

    let mut config = match &args.config {
        Some(path) => SidecarConfig::load(path)?,
        None => SidecarConfig::from_env(),
    };
    if let Some(endpoint) = &args.sidecar {
        config = config.with_endpoint(endpoint);
    }

    let client = SidecarClient::new(config)?;
    demo::run(client, &demo::DemoSettings::from(&args)).await
}
