//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Sherpa - install CLI tools anywhere, and fix the installs that fail.
#[derive(Debug, Parser)]
#[command(name = "sherpa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a tool using the best method for this system
    Install(InstallArgs),

    /// Show how a tool would be installed, without running anything
    Plan(PlanArgs),

    /// Diagnose captured output from a failed install
    Diagnose(DiagnoseArgs),

    /// Show the detected system profile
    Doctor(DoctorArgs),

    /// List catalog tools and their install methods
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Tool to install
    pub tool: String,

    /// Force a specific install method instead of the preference order
    #[arg(short, long)]
    pub method: Option<String>,

    /// Seconds before the install command is killed
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// Tool to plan for
    pub tool: String,

    /// Resolve against a named system preset instead of this machine
    #[arg(long)]
    pub preset: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `diagnose` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DiagnoseArgs {
    /// Tool whose install failed
    pub tool: String,

    /// Method that was attempted
    #[arg(short, long)]
    pub method: String,

    /// File with the captured output (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Resolve against a named system preset instead of this machine
    #[arg(long)]
    pub preset: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `doctor` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_install_with_flags() {
        let cli = Cli::parse_from(["sherpa", "install", "ripgrep", "--yes", "--timeout", "60"]);
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.tool, "ripgrep");
                assert!(args.yes);
                assert_eq!(args.timeout, 60);
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn parses_plan_with_preset() {
        let cli = Cli::parse_from(["sherpa", "plan", "jq", "--preset", "alpine", "--json"]);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.tool, "jq");
                assert_eq!(args.preset.as_deref(), Some("alpine"));
                assert!(args.json);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn parses_diagnose_with_method() {
        let cli = Cli::parse_from(["sherpa", "diagnose", "gh", "--method", "apt"]);
        match cli.command {
            Commands::Diagnose(args) => {
                assert_eq!(args.tool, "gh");
                assert_eq!(args.method, "apt");
                assert!(args.input.is_none());
            }
            _ => panic!("expected diagnose"),
        }
    }

    #[test]
    fn global_flags_parse_anywhere() {
        let cli = Cli::parse_from(["sherpa", "doctor", "--json", "--quiet"]);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Doctor(args) if args.json));
    }

    #[test]
    fn timeout_defaults_to_ten_minutes() {
        let cli = Cli::parse_from(["sherpa", "install", "jq"]);
        match cli.command {
            Commands::Install(args) => assert_eq!(args.timeout, 600),
            _ => panic!("expected install"),
        }
    }
}
