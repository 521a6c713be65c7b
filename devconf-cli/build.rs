//! Build script for devconf-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("devconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compose development server configurations")
        .long_about(
            "Merge a shared base configuration with a development overlay, negotiate a free \
             port, and publish the finished configuration with its plugin pipeline",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommands(vec![
            Command::new("publish")
                .about("Publish a development configuration with a negotiated port")
                .long_about(
                    "Merge the base files with the development overlay, negotiate a free port \
                     starting from the preferred one, and print the finished configuration",
                ),
            Command::new("merge")
                .about("Merge configuration files without negotiating a port")
                .long_about("Deep-merge configuration files, lowest precedence first"),
            Command::new("probe")
                .about("Find the first free port at or above a preferred one")
                .long_about("Scan upward from a preferred port and print the first free one"),
            Command::new("validate")
                .about("Validate a development settings file")
                .long_about("Check a development settings file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() -> io::Result<()> {
    // Generate man pages at build time
    let out_dir = PathBuf::from(
        std::env::var_os("OUT_DIR")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?,
    );
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    // Generate main devconf.1 man page
    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;

    fs::write(man_dir.join("devconf.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
