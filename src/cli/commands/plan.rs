//! The `plan` command: dry-run resolution.

use crate::catalog::Catalog;
use crate::cli::args::PlanArgs;
use crate::engine::Engine;
use crate::error::Result;
use crate::handlers::HandlerRegistry;
use crate::resolve::Selection;
use crate::ui::Ui;

use super::{display, load_profile};

pub fn run(args: &PlanArgs, ui: &Ui) -> Result<u8> {
    let catalog = Catalog::builtin()?;
    let registry = HandlerRegistry::builtin();
    let engine = Engine::new(&catalog, &registry)?;
    let profile = load_profile(args.preset.as_deref())?;

    let resolution = engine.resolve_and_plan(&args.tool, &profile)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&resolution).map_err(anyhow::Error::from)?
        );
    } else {
        display::print_statuses(ui, &resolution);
        display::print_selection(ui, &resolution);
    }

    Ok(match resolution.selection {
        Selection::Ready { .. } => 0,
        Selection::Locked { .. } => 1,
        Selection::NoneAvailable { .. } => 2,
    })
}
