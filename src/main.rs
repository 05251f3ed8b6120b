//! engine-bootstrap CLI entry point.

use anyhow::Context;
use clap::Parser;

use engine_bootstrap::cli::{commands, handle_error, Cli, Commands};
use engine_bootstrap::infrastructure::config::ConfigLoader;
use engine_bootstrap::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        handle_error(err, cli.json);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _logger = LoggerImpl::init(&LogConfig::from_settings(&config.logging)?)?;

    match cli.command {
        Commands::Discover => commands::discover::execute(&config, cli.json).await,
        Commands::Credentials => commands::credentials::execute(&config, cli.json).await,
    }
}
