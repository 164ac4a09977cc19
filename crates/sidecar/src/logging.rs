use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to a file and optionally to stdout
///
/// The filter is `<level>,sidecar=<level>,routing_sample=<level>,hyper=info`
/// unless `filter` overrides it.
pub fn setup_global_logging(
    log_path: impl AsRef<Path>,
    log_level: &tracing::Level,
    filter: Option<&str>,
    with_stdout: bool,
) -> Result<()> {
    let log_path = log_path.as_ref();
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let log_file = File::create(log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    let directives = filter
        .map(str::to_string)
        .unwrap_or_else(|| default_filter(log_level));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_filter(EnvFilter::builder().parse(&directives)?);

    let stdout_layer = if with_stdout {
        Some(
            fmt::layer()
                .pretty()
                .with_filter(EnvFilter::builder().parse(&directives)?),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

/// Compact stdout logging for console programs
pub fn setup_stdout_logging(log_level: &tracing::Level) -> Result<()> {
    let filter = EnvFilter::builder().parse(default_filter(log_level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact().with_filter(filter))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

fn default_filter(log_level: &tracing::Level) -> String {
    format!(
        "{},sidecar={},routing_sample={},actor_client={},hyper=info",
        log_level.as_str(),
        log_level.as_str(),
        log_level.as_str(),
        log_level.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = default_filter(&tracing::Level::DEBUG);
        assert!(filter.starts_with("DEBUG,sidecar=DEBUG"));
        assert!(EnvFilter::builder().parse(&filter).is_ok());
    }
}
