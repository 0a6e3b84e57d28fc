//! Coverage harness.
//!
//! Enumerates (tool × declared failure scenario × system preset) over the
//! built-in catalog and handler registry, and asserts every combination
//! that can occur yields a matched handler with at least one option that
//! is actionable on that preset. A failing cell means a gap in the
//! registry or a false promise in a recipe.

use sherpa::catalog::{Catalog, MethodSpec};
use sherpa::chain::Readiness;
use sherpa::engine::{CapturedOutput, Diagnosis, Engine};
use sherpa::handlers::{HandlerEntry, HandlerRegistry};
use sherpa::profile::presets;
use sherpa::resolve::resolve_all;

/// Handler entries whose failures can occur for this method: its own
/// tool table, its ecosystem or family table, and the infra layer.
fn relevant_entries<'r>(
    registry: &'r HandlerRegistry,
    spec: &MethodSpec,
    tool: &str,
) -> Vec<&'r HandlerEntry> {
    let mut entries: Vec<&HandlerEntry> = Vec::new();
    entries.extend(registry.tool(tool));
    if let Some(tag) = spec.eco_tag() {
        entries.extend(registry.ecosystem(tag));
    }
    if let Some(tag) = spec.family_tag() {
        entries.extend(registry.family(tag));
    }
    entries.extend(registry.infra());
    entries
}

#[test]
fn every_failure_scenario_has_an_actionable_option() {
    let catalog = Catalog::builtin().unwrap();
    let registry = HandlerRegistry::builtin();
    let engine = Engine::new(&catalog, &registry).unwrap();

    let mut cells = 0usize;
    for (preset_name, profile) in presets::all() {
        for recipe in catalog.tools() {
            let statuses = resolve_all(recipe, &profile, &catalog);
            for (method, status) in &statuses {
                // A failure scenario presupposes the method was runnable.
                if !status.is_ready() {
                    continue;
                }
                let spec = recipe.method(method).unwrap();
                for entry in relevant_entries(&registry, spec, &recipe.tool) {
                    cells += 1;
                    let captured = CapturedOutput {
                        exit_code: Some(1),
                        stderr: entry.sample.to_string(),
                        ..Default::default()
                    };
                    let diagnosis = engine
                        .diagnose(&recipe.tool, method, &captured, &profile)
                        .unwrap_or_else(|e| {
                            panic!(
                                "diagnose failed for {}/{} scenario '{}' on {}: {}",
                                recipe.tool, method, entry.name, preset_name, e
                            )
                        });
                    let plan = match diagnosis {
                        Diagnosis::Matched { plan } => plan,
                        Diagnosis::Unmatched { .. } => panic!(
                            "scenario '{}' unmatched for {}/{} on {}",
                            entry.name, recipe.tool, method, preset_name
                        ),
                    };
                    assert!(
                        plan.options
                            .iter()
                            .any(|o| o.readiness != Readiness::Unavailable),
                        "no actionable option for {}/{} scenario '{}' on {} (matched {})",
                        recipe.tool,
                        method,
                        entry.name,
                        preset_name,
                        plan.handler
                    );
                }
            }
        }
    }
    // The cross product must actually cover something substantial.
    assert!(cells > 500, "harness only visited {} cells", cells);
}

#[test]
fn infra_scenarios_cover_every_ready_method() {
    // The nine canonical infrastructure failures must diagnose for every
    // (tool, ready method, preset) cell, not just for methods with
    // family-specific tables.
    let catalog = Catalog::builtin().unwrap();
    let registry = HandlerRegistry::builtin();
    let engine = Engine::new(&catalog, &registry).unwrap();

    let canonical = [
        "curl: (6) Could not resolve host: github.com",
        "HTTP 403 Forbidden: blocked by corporate proxy",
        "tar: write error: No space left on device",
        "touch: /usr/bin/probe: Read-only file system",
        "sh: sudo: not found",
        "sudo: 3 incorrect password attempts",
        "open(/usr/local/bin): Permission denied",
        "fatal error: Killed signal terminated program cc1plus: out of memory",
        "command timed out after 120s",
    ];

    for (preset_name, profile) in presets::all() {
        for recipe in catalog.tools() {
            let statuses = resolve_all(recipe, &profile, &catalog);
            for (method, status) in &statuses {
                if !status.is_ready() {
                    continue;
                }
                for failure in canonical {
                    let captured = CapturedOutput {
                        exit_code: Some(1),
                        stderr: failure.to_string(),
                        ..Default::default()
                    };
                    let diagnosis = engine
                        .diagnose(&recipe.tool, method, &captured, &profile)
                        .unwrap();
                    assert!(
                        matches!(diagnosis, Diagnosis::Matched { .. }),
                        "'{}' unmatched for {}/{} on {}",
                        failure,
                        recipe.tool,
                        method,
                        preset_name
                    );
                }
            }
        }
    }
}

#[test]
fn every_preset_can_install_something() {
    // Sanity on the matrix itself: each preset leaves at least one tool
    // with a ready method, otherwise the harness is vacuous there.
    let catalog = Catalog::builtin().unwrap();
    for (preset_name, profile) in presets::all() {
        let ready_somewhere = catalog.tools().any(|recipe| {
            resolve_all(recipe, &profile, &catalog)
                .values()
                .any(|status| status.is_ready())
        });
        // The read-only preset is the intended exception: only manager
        // methods survive, and none of its managers are installed.
        if preset_name == "alpine-readonly" {
            continue;
        }
        assert!(ready_somewhere, "nothing installable on {}", preset_name);
    }
}
