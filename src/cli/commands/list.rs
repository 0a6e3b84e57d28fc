//! The `list` command: catalog tools and their methods.

use crate::catalog::Catalog;
use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::ui::Ui;

pub fn run(args: &ListArgs, ui: &Ui) -> Result<u8> {
    let catalog = Catalog::builtin()?;

    if args.json {
        let tools: Vec<_> = catalog.tools().collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&tools).map_err(anyhow::Error::from)?
        );
        return Ok(0);
    }

    ui.heading(&format!("{} tools in the catalog:", catalog.len()));
    for recipe in catalog.tools() {
        ui.info(&format!(
            "  {:<12} {} [{}]",
            recipe.tool,
            recipe.summary,
            recipe.prefer.join(", ")
        ));
    }
    Ok(0)
}
