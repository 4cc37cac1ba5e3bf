//! crewd - session-addressed message relay for coordinating coding agents.

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod config;
mod error;
mod logging;
mod mcp;
mod registry;
mod sweep;
mod tools;
mod web;

use cli::Commands;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; the guard keeps the file appender flushing.
    let _guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args = Commands::parse();

    match args.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
