//! Logging setup

use crate::config::LoggingConfig;
use anyhow::{anyhow, Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the log filter for the configured level.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level {:?}", config.level))
}

/// Install the global tracing subscriber.
///
/// Calling it again once a subscriber is installed is a no-op.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        other => return Err(anyhow!("Unknown log format {:?}", other)),
    };

    if let Err(e) = installed {
        debug!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}
