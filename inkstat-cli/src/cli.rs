//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::Parser;
use inkstat_core::tracing::{TracingConfig, TracingLevel, TracingOutput};

/// Default frame file when `--output` is not given
pub const DEFAULT_OUTPUT: &str = "inkstat.pbm";

/// Host health dashboard for a 2.13" e-ink panel
#[derive(Parser, Debug)]
#[command(name = "inkstat")]
#[command(author, version, about = "Show host health on an e-ink display")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "INKSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter directives, overriding -v/-q (e.g. `inkstat_core::probe=debug`)
    #[arg(long, env = "INKSTAT_LOG", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// File that receives each refreshed frame (binary PBM)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Show the line layout test page and exit
    #[arg(long, conflicts_with = "once")]
    pub line_test: bool,
}

impl Cli {
    /// Logging setup requested on the command line
    pub fn tracing_config(&self) -> TracingConfig {
        let mut config = TracingConfig::new()
            .with_level(TracingLevel::from_verbosity(self.verbose, self.quiet));
        if let Some(path) = &self.log_file {
            config = config.with_output(TracingOutput::File { path: path.clone() });
        }
        if let Some(filter) = &self.log_filter {
            config = config.with_filter(filter.clone());
        }
        config
    }
}
