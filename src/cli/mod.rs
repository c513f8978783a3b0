//! cli
//!
//! Command-line host for the report boundary.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and build the [`crate::api::Reporter`]
//! - Print the JSON response and map failures to a non-zero exit
//!
//! The CLI layer is thin. All validation, rendering and delivery happen
//! behind the api boundary.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::Result;

use crate::ui::output::{self, Verbosity};

/// Settings shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Output verbosity
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    output::init_logging(verbosity);

    let ctx = Context {
        config: cli.config.clone(),
        verbosity,
    };

    commands::dispatch(cli.command, &ctx)
}
