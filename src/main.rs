mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::args::Cli;
use procscope::config::{load_config, validate_config};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Routes diagnostics to stderr so stdout carries only results
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn try_main(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    validate_config(&config).context("validating configuration")?;

    init_logging(&config.logging.level);
    info!("procscope v{} on {}", procscope::core::VERSION, std::env::consts::OS);

    let ctx = cli::RunContext::new(&config, cli.json);
    cli::run(cli.command, &ctx)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = try_main(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
