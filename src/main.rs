// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            config,
            snapshot,
            absolute,
        } => commands::cmd_resolve(&config, &snapshot, absolute),

        Commands::Package {
            config,
            snapshot,
            output,
        } => commands::cmd_package(&config, &snapshot, output),

        Commands::Inspect { descriptor } => commands::cmd_inspect(&descriptor),

        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "clpack", &mut std::io::stdout());
            Ok(())
        }
    }
}
