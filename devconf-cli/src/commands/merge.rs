//! Command to merge configuration files.

use crate::error::CliError;
use crate::utils::{emit, load_merged, render, GlobalOptions, OutputFormat};
use clap::Args;
use std::path::PathBuf;

/// Merge configuration files, lowest precedence first.
///
/// Mappings merge recursively, sequences concatenate, and anything else
/// takes the later file's value.
#[derive(Args)]
pub struct MergeCommand {
    /// Files to merge, lowest precedence first
    #[arg(value_name = "PATH", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl MergeCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let merged = load_merged(&self.files)?;

        if global.verbose {
            eprintln!(
                "Merged {} files into {} top-level options",
                self.files.len(),
                merged.len()
            );
        }

        emit(&render(&merged, self.format)?, self.output.as_deref())
    }
}
