//! The `diagnose` command: match captured output, print the plan.

use std::io::Read;

use crate::catalog::Catalog;
use crate::cli::args::DiagnoseArgs;
use crate::engine::{CapturedOutput, Diagnosis, Engine};
use crate::error::Result;
use crate::handlers::HandlerRegistry;
use crate::ui::Ui;

use super::{display, load_profile};

pub fn run(args: &DiagnoseArgs, ui: &Ui) -> Result<u8> {
    let catalog = Catalog::builtin()?;
    let registry = HandlerRegistry::builtin();
    let engine = Engine::new(&catalog, &registry)?;
    let profile = load_profile(args.preset.as_deref())?;

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let captured = CapturedOutput {
        exit_code: None,
        stdout: String::new(),
        stderr: text,
        timed_out: false,
    };

    match engine.diagnose(&args.tool, &args.method, &captured, &profile)? {
        Diagnosis::Matched { plan } => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&plan).map_err(anyhow::Error::from)?
                );
            } else {
                display::print_plan(ui, &plan);
            }
            Ok(0)
        }
        Diagnosis::Unmatched { output } => {
            if args.json {
                let value = serde_json::json!({ "unmatched": output });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&value).map_err(anyhow::Error::from)?
                );
            } else {
                ui.warning("No handler recognized this failure. Raw output:");
                for line in output.lines() {
                    ui.info(&format!("  {}", line));
                }
            }
            Ok(1)
        }
    }
}
