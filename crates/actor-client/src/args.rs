use clap::Parser;
use std::path::PathBuf;

/// Actor client - drives the demo actor through typed, untyped and raw HTTP calls
#[derive(Debug, Parser)]
#[command(name = "actor-client")]
#[command(author, version, about)]
pub struct ClientArgs {
    /// Sidecar HTTP endpoint (defaults to DAPR_HTTP_ENDPOINT / DAPR_HTTP_PORT)
    #[arg(long)]
    pub sidecar: Option<String>,

    /// Base URL of the application the actor is hosted in
    #[arg(long, default_value = "http://localhost:5000")]
    pub app_url: String,

    /// Actor id used for proxy calls
    #[arg(long, default_value = "abc")]
    pub actor_id: String,

    /// Actor id used for the raw HTTP calls
    #[arg(long, default_value = "123")]
    pub raw_actor_id: String,

    /// Seconds to wait for the timer and reminder to fire
    #[arg(long, default_value_t = 6)]
    pub wait_secs: u64,

    /// Sidecar config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level (e.g. 'info', 'debug')
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}
