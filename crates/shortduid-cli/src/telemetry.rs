//! Log output for the CLI.
//!
//! Events from both the binary and the `shortduid` library (built with its
//! `tracing` feature) go to stderr through `tracing_subscriber::fmt`, so
//! stdout only ever carries command output. Verbosity follows `RUST_LOG`
//! and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=shortduid=trace shortduid int 8192
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
