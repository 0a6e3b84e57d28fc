//! The `install` command: resolve, execute, and on failure diagnose.

use tracing::info;

use crate::catalog::{install_command, Catalog};
use crate::cli::args::InstallArgs;
use crate::engine::{Diagnosis, Engine};
use crate::error::{Result, SherpaError};
use crate::exec::{CommandExecutor, ExecRequest, ShellExecutor};
use crate::handlers::HandlerRegistry;
use crate::profile::SystemProfile;
use crate::resolve::{AvailabilityStatus, Selection};
use crate::ui::Ui;

use super::display;

pub fn run(args: &InstallArgs, ui: &Ui) -> Result<u8> {
    let catalog = Catalog::builtin()?;
    let registry = HandlerRegistry::builtin();
    let engine = Engine::new(&catalog, &registry)?;
    let profile = SystemProfile::detect();

    let resolution = engine.resolve_and_plan(&args.tool, &profile)?;

    // Decide which method to run.
    let (method, command) = match &args.method {
        Some(forced) => {
            let status = resolution.statuses.get(forced).ok_or_else(|| {
                SherpaError::UnknownMethod {
                    tool: args.tool.clone(),
                    method: forced.clone(),
                }
            })?;
            match status {
                AvailabilityStatus::Ready => {
                    let recipe = catalog.require(&args.tool)?;
                    let spec = recipe.method(forced).expect("status implies method");
                    (
                        forced.clone(),
                        install_command(recipe, forced, spec, &profile)?,
                    )
                }
                AvailabilityStatus::Locked { unlock } => {
                    ui.warning(&format!(
                        "Method '{}' is locked: {}",
                        forced, unlock.hint
                    ));
                    return Ok(1);
                }
                AvailabilityStatus::Impossible { reason } => {
                    ui.error(&format!("Method '{}' cannot work here: {}", forced, reason));
                    return Ok(2);
                }
            }
        }
        None => match &resolution.selection {
            Selection::Ready { method } => (
                method.clone(),
                resolution.command.clone().expect("ready selection renders"),
            ),
            Selection::Locked { .. } => {
                display::print_selection(ui, &resolution);
                return Ok(1);
            }
            Selection::NoneAvailable { .. } => {
                display::print_selection(ui, &resolution);
                return Ok(2);
            }
        },
    };

    info!(tool = %args.tool, %method, %command, "install selected");
    ui.info(&format!("Installing {} via {}", args.tool, method));
    ui.detail(&format!("$ {}", command));

    if !args.yes && !ui.confirm(&format!("Run: {} ?", command), true) {
        ui.warning("Aborted");
        return Ok(1);
    }

    let spinner = ui.spinner(&format!("Running {}", method));
    let executor = ShellExecutor::new();
    let captured = executor.execute(&ExecRequest {
        command: command.clone(),
        timeout: Some(args.timeout),
    })?;
    spinner.finish_and_clear();

    if captured.exit_code == Some(0) && !captured.timed_out {
        ui.success(&format!("{} installed", args.tool));
        return Ok(0);
    }

    ui.error(&format!(
        "Install failed{}",
        captured
            .exit_code
            .map(|c| format!(" (exit {})", c))
            .unwrap_or_else(|| " (killed)".to_string())
    ));

    match engine.diagnose(&args.tool, &method, &captured, &profile)? {
        Diagnosis::Matched { plan } => {
            display::print_plan(ui, &plan);
        }
        Diagnosis::Unmatched { output } => {
            ui.warning("No handler recognized this failure. Raw output:");
            for line in output.lines().take(40) {
                ui.info(&format!("  {}", line));
            }
        }
    }
    Ok(1)
}
