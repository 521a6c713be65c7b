//! Command to validate a development settings file.

use crate::error::CliError;
use crate::utils::{load_settings, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Validate a development settings file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Settings file to validate
    #[arg(value_name = "SETTINGS_PATH")]
    pub settings_path: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if !self.settings_path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                self.settings_path.display()
            )));
        }

        match load_settings(Some(&self.settings_path)) {
            Ok(_) => {
                if !global.quiet {
                    println!("Settings are valid");
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Validation error: {e}");
                Err(e)
            }
        }
    }
}
