//! Stimulant-mention criteria search CLI.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let result = match &cli.command {
        Command::Cdc(args) => commands::run_cdc(args),
        Command::Bettano(args) => commands::run_bettano(args),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Honor `RUST_LOG` when set; otherwise derive the filter from the verbosity
/// flags, keeping external crates at warn level.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = cli
            .verbosity
            .tracing_level_filter()
            .to_string()
            .to_lowercase();
        EnvFilter::new(format!(
            "warn,stimsearch_cli={level},stimsearch_engine={level},stimsearch_model={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
