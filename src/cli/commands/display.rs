//! Shared rendering for resolutions and plans.

use console::style;

use crate::chain::{ChainNode, Readiness, RemediationPlan};
use crate::engine::Resolution;
use crate::resolve::{AvailabilityStatus, Selection};
use crate::ui::Ui;

fn status_word(status: &AvailabilityStatus) -> String {
    match status {
        AvailabilityStatus::Ready => style("ready").green().to_string(),
        AvailabilityStatus::Locked { unlock } => format!(
            "{} ({})",
            style("locked").yellow(),
            unlock.hint
        ),
        AvailabilityStatus::Impossible { reason } => {
            format!("{} ({})", style("impossible").red(), reason)
        }
    }
}

/// Per-method availability table.
pub fn print_statuses(ui: &Ui, resolution: &Resolution) {
    ui.heading(&format!("Methods for {}:", resolution.tool));
    for (method, status) in &resolution.statuses {
        ui.info(&format!("  {:<12} {}", method, status_word(status)));
    }
}

/// The selection verdict, including the unlock chain preview for a
/// locked selection.
pub fn print_selection(ui: &Ui, resolution: &Resolution) {
    match &resolution.selection {
        Selection::Ready { method } => {
            ui.success(&format!(
                "Selected method '{}': {}",
                method,
                resolution.command.as_deref().unwrap_or("")
            ));
        }
        Selection::Locked { method, unlock } => {
            ui.warning(&format!(
                "Method '{}' is locked: {}",
                method, unlock.hint
            ));
            if let Some(chain) = &resolution.unlock_chain {
                ui.info("Unlock by running, in order:");
                print_chain(ui, chain, 1);
                if let Some(command) = &resolution.command {
                    ui.info(&format!("  then: {}", command));
                }
            }
        }
        Selection::NoneAvailable { reasons } => {
            ui.error(&format!("No install method works for {}:", resolution.tool));
            for (method, reason) in reasons {
                ui.info(&format!("  {:<12} {}", method, reason));
            }
        }
    }
}

/// Recursive chain rendering, prerequisites first.
pub fn print_chain(ui: &Ui, node: &ChainNode, depth: usize) {
    for child in &node.children {
        print_chain(ui, child, depth + 1);
    }
    let indent = "  ".repeat(depth);
    match &node.command {
        Some(command) => ui.info(&format!("{}{}: {}", indent, node.tool, command)),
        None => ui.warning(&format!(
            "{}{}: no usable install method on this system",
            indent, node.tool
        )),
    }
}

/// The remediation plan, options in declared order.
pub fn print_plan(ui: &Ui, plan: &RemediationPlan) {
    ui.heading(&format!(
        "Diagnosis: {} ({:?}, {} layer)",
        plan.handler, plan.category, plan.layer
    ));
    for (index, option) in plan.options.iter().enumerate() {
        let marker = if option.option.recommended {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        let readiness = match option.readiness {
            Readiness::Executable => style("run now").green().to_string(),
            Readiness::RequiresUnlock => style("needs prerequisites").yellow().to_string(),
            Readiness::Unavailable => style("not possible here").red().to_string(),
        };
        ui.info(&format!(
            "{} {}. {} [{}]",
            marker,
            index + 1,
            option.option.strategy.label(),
            readiness
        ));
        for command in &option.commands {
            ui.info(&format!("     $ {}", command));
        }
    }
}
