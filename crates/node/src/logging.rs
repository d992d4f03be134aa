use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber. `RUST_LOG` takes precedence over `fallback`.
pub fn init(fallback: &str) -> Result<()> {
    let filt = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    let stdout_sub = tracing_subscriber::fmt::layer().compact().with_filter(filt);
    tracing_subscriber::registry().with(stdout_sub).try_init()?;

    info!("logging started");
    Ok(())
}
