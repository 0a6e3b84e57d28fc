//! Command-line interface.

mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, DiagnoseArgs, DoctorArgs, InstallArgs, ListArgs, PlanArgs,
};

use crate::error::Result;
use crate::ui::Ui;

/// Route a parsed command line to its implementation. Returns the
/// process exit code: 0 success/ready, 1 failure, 2 nothing available.
pub fn dispatch(cli: &Cli, ui: &Ui) -> Result<u8> {
    match &cli.command {
        Commands::Install(args) => commands::install::run(args, ui),
        Commands::Plan(args) => commands::plan::run(args, ui),
        Commands::Diagnose(args) => commands::diagnose::run(args, ui),
        Commands::Doctor(args) => commands::doctor::run(args, ui),
        Commands::List(args) => commands::list::run(args, ui),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
