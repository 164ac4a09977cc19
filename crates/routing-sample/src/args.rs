use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use routing_sample::config::{DEFAULT_PAUSE_SECS, DEFAULT_PUBSUB_NAME};
use routing_sample::store::DEFAULT_STORE_NAME;

/// Routing sample - account events and voice webhook behind a sidecar
#[derive(Debug, Parser)]
#[command(name = "routing-sample")]
#[command(author, version, about)]
pub struct ServiceArgs {
    /// Address to bind the service to (the sidecar's app port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    pub address: SocketAddr,

    /// Name of the sidecar state store holding accounts
    #[arg(long, default_value = DEFAULT_STORE_NAME)]
    pub store_name: String,

    /// Name of the pub/sub component the topics belong to
    #[arg(long, default_value = DEFAULT_PUBSUB_NAME)]
    pub pubsub_name: String,

    /// Seconds an inbound call is held
    #[arg(long, default_value_t = DEFAULT_PAUSE_SECS)]
    pub pause_secs: u32,

    /// Keep accounts in process memory instead of the sidecar state store
    #[arg(long)]
    pub in_memory: bool,

    /// Sidecar HTTP endpoint (defaults to DAPR_HTTP_ENDPOINT / DAPR_HTTP_PORT)
    #[arg(long)]
    pub sidecar: Option<String>,

    /// Sidecar config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level (simple version, e.g. 'info', 'debug')
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Advanced logging filter (e.g. "routing_sample=debug,tower_http=debug")
    /// This overrides log_level if provided
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Log directory
    #[arg(long, default_value = "$HOME/.local/state/routing-sample")]
    pub log_dir: String,

    /// Log to stdout
    #[arg(long)]
    pub log_stdout: bool,
}
