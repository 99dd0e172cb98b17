//! Tracing initialization.
//!
//! Sets up `tracing-subscriber` with an `EnvFilter` (default `info`) and a
//! console fmt layer. Log verbosity is controlled through the standard
//! `RUST_LOG` environment variable, e.g. `RUST_LOG=drivectl=debug`.

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");

    Ok(())
}
