//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the default locations
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Reporter - deliver issue reports to GitHub, GitLab, Bitbucket or email
#[derive(Parser, Debug)]
#[command(name = "reporter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Form input shared by `report` and `preview`.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Form field as key=value (repeatable; overrides --input)
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Read form fields from a JSON object file ('-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a report to the configured destination
    #[command(
        name = "report",
        long_about = "Submit a report to the configured destination.\n\n\
            The form must contain a non-empty title. The report body is rendered \
            from the configured template and delivered to the issue tracker or \
            mail recipient. The JSON response is printed to stdout.",
        after_help = "\
EXAMPLES:
    # Report a bug with a title and description
    reporter report -f title=\"Crash on save\" -f description=\"It crashes\"

    # Read fields from a JSON file and open the created issue
    reporter report --input form.json --open"
    )]
    Report {
        #[command(flatten)]
        form: FormArgs,

        /// Open the created issue in the browser
        #[arg(long)]
        open: bool,
    },

    /// Render the report body without sending it
    #[command(name = "preview")]
    Preview {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Print the form field definitions as JSON
    #[command(name = "fields")]
    Fields,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    reporter completion bash > ~/.local/share/bash-completion/completions/reporter

    # Zsh
    reporter completion zsh > ~/.zfunc/_reporter

    # Fish
    reporter completion fish > ~/.config/fish/completions/reporter.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_report_fields() {
        let cli = Cli::try_parse_from([
            "reporter",
            "report",
            "-f",
            "title=Bug",
            "--field",
            "description=It crashes",
            "--open",
        ])
        .unwrap();

        match cli.command {
            Command::Report { form, open } => {
                assert_eq!(form.fields, vec!["title=Bug", "description=It crashes"]);
                assert!(form.input.is_none());
                assert!(open);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["reporter", "fields", "--config", "c.toml", "-q"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(cli.quiet);
    }
}
