//! ## tintlog-cli
//! **Playground for the tintlog pipeline**
//!
//! Runs the demo scenarios, floods a logger to watch repeat suppression at
//! work, and prints the configuration a logger would start with.

use clap::Parser;
use tintlog_telemetry::Diagnostics;

mod commands;
mod demo;
mod error;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Diagnostics::init();
    let cli = Cli::parse();
    commands::run_command(cli).await?;
    Ok(())
}
