//! Command handler modules for the CLI.

mod run;

use crate::cli::Cli;
use crate::error::CliError;

/// Dispatch to the line test page or the polling loop.
pub fn dispatch(cli: &Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    if cli.line_test {
        line_test::cmd_line_test(config_path, &cli.output)
    } else {
        run::cmd_run(config_path, &cli.output, cli.once)
    }
}
