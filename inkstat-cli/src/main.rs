//! `inkstat` - host health dashboard for a 2.13" e-ink display
//!
//! Polls the configured hosts in order, shows one page per host followed by
//! a summary page, and repeats until interrupted.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use error::CliError;
use inkstat_core::error::InkstatError;
use inkstat_core::tracing::init_tracing;

fn main() {
    let cli = Cli::parse();

    let result = init_tracing(&cli.tracing_config())
        .map_err(|e| CliError::from(InkstatError::from(e)))
        .and_then(|()| commands::dispatch(&cli));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
