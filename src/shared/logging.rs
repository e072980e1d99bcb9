//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber. `RUST_LOG` takes precedence over
/// `default_filter`. Fails instead of panicking when a global subscriber is
/// already set, so tests can call it repeatedly.
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
