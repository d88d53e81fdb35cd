use anyhow::Result;
use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "awimport=info,awimport_core=info";

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logs go to stderr; stdout is reserved for the output variables.
pub fn init_logging(format: LogFormat) -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let base = fmt::layer().with_target(false).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env)
            .with(base.json())
            .try_init()?,
        LogFormat::Text => tracing_subscriber::registry()
            .with(env)
            .with(base.compact())
            .try_init()?,
    }
    Ok(())
}
