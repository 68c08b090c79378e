use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use tradefest::cli::{self, Cli};
use tradefest::config::{AppConfig, LoggingConfig};
use tradefest::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config_dir)?;
    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
    }

    init_logging(&config.logging)?;
    config.ensure_valid()?;
    debug!(
        config_dir = %cli.config_dir,
        base_url = %config.server.base_url,
        "configuration loaded"
    );

    if let Err(e) = cli::run(&cli.command, &config).await {
        error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,tradefest={}", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;
    Ok(())
}
