use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber
///
/// `RUST_LOG` wins over the configured filter. Output goes to stderr so that
/// command output on stdout stays machine-readable.
pub fn init(filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter)
            .with_context(|| format!("Invalid log filter: {:?}", filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}
