//! Symlock command-line entry point.
//!
//! Parses arguments, installs logging, dispatches to the command handler,
//! and maps errors to exit codes.

mod cli;
mod commands;

use cli::Cli;
use std::process::ExitCode;
use symlock::logging;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
