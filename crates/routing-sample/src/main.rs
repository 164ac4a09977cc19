use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use routing_sample::{router, InMemoryStateStore, RoutingConfig, SidecarStateStore, StateStore};
use sidecar::{logging, SidecarClient, SidecarConfig};

mod args;

use args::ServiceArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServiceArgs::parse();

    let log_path = shellexpand::env(&args.log_dir)
        .map_err(|e| anyhow::anyhow!("Failed to expand log directory: {}", e))?;
    let log_path = PathBuf::from(log_path.as_ref()).join("routing_sample.log");

    let log_level = args.log_level.parse().unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Defaulting to 'info'.",
            args.log_level
        );
        tracing::Level::INFO
    });

    logging::setup_global_logging(
        &log_path,
        &log_level,
        args.log_filter.as_deref(),
        args.log_stdout,
    )?;

    info!("Logging to {}", log_path.display());

    let store: Arc<dyn StateStore> = if args.in_memory {
        info!("Using in-memory account store");
        Arc::new(InMemoryStateStore::new())
    } else {
        let mut config = match &args.config {
            Some(path) => SidecarConfig::load(path)?,
            None => SidecarConfig::from_env(),
        };
        if let Some(endpoint) = &args.sidecar {
            config = config.with_endpoint(endpoint);
        }
        info!(
            "Using state store '{}' via sidecar at {}",
            args.store_name, config.http_endpoint
        );
        Arc::new(SidecarStateStore::new(SidecarClient::new(config)?, &args.store_name))
    };

    let config = RoutingConfig {
        pubsub_name: args.pubsub_name.clone(),
        pause_length: args.pause_secs,
        ..RoutingConfig::default()
    };

    routing_sample::server::serve(args.address, router(store, &config)).await
}
