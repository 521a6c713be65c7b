//! Main entry point for the devconf CLI.
//!
//! This is the command-line interface for composing development server
//! configurations. It provides these commands:
//! - `publish`: Merge, negotiate a port, build the plugin pipeline, and print
//! - `merge`: Merge configuration files
//! - `probe`: Find a free port
//! - `validate`: Validate a development settings file

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    devconf::init_logger(cli.verbose, cli.quiet).install();

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Publish(cmd) => cmd.execute(&global).await,
        cli::Command::Merge(cmd) => cmd.execute(&global),
        cli::Command::Probe(cmd) => cmd.execute(&global).await,
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
