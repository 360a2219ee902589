mod cli;
mod commands;

use std::time::Duration;

use admin_client::{AdminConsole, ConsoleConfig, init_logger};
use clap::Parser;

use cli::Cli;

fn build_config(cli: &Cli) -> ConsoleConfig {
    let mut config = ConsoleConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(timeout));
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.log_json |= cli.log_json;
    if cli.log_dir.is_some() {
        config.log_dir = cli.log_dir.clone();
    }
    // a CLI has no prompt to open
    config.with_prompt_on_deny(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = build_config(&cli);

    let _log_guard = init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    let console = AdminConsole::connect(config)?;
    if let Err(e) = console.start().await {
        tracing::warn!(error = %e, "Failed to restore session");
    }

    let result = commands::run(&console, cli.command).await;
    console.shutdown();
    result
}
