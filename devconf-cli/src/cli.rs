//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, MergeCommand, ProbeCommand, PublishCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};

/// Command-line tool for composing development server configurations.
#[derive(Parser)]
#[command(name = "devconf")]
#[command(
    version,
    about = "Compose development server configurations",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Publish a development configuration with a negotiated port
    Publish(PublishCommand),

    /// Merge configuration files without negotiating a port
    Merge(MergeCommand),

    /// Find the first free port at or above a preferred one
    Probe(ProbeCommand),

    /// Validate a development settings file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_publish_collects_repeated_bases() {
        let cli = Cli::try_parse_from([
            "devconf", "publish", "--base", "a.yaml", "--base", "b.json", "--port", "0",
        ])
        .unwrap();

        match cli.command {
            Command::Publish(cmd) => {
                assert_eq!(cmd.base.len(), 2);
                assert_eq!(cmd.port, Some(0));
            }
            _ => panic!("expected publish"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["devconf", "probe", "8080", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }
}
