//! `cloud-risk` terminal client entry point.

use anyhow::{Context, Result};
use clap::Parser;
use cloud_risk_app::{ClientConfig, init_tracing};

mod cli;
mod output;

use cli::Cli;

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref()).context("failed to load config")?;
    init_tracing(&config.logging).context("failed to initialize logging")?;
    cli.execute(&config)
}

fn main() {
    if let Err(error) = run() {
        output::print_error(&format!("{error:#}"));
        std::process::exit(1);
    }
}
