//! Catalog validation.
//!
//! Runs at load time, before any resolution. A recipe that fails here is
//! a configuration error and the whole catalog is rejected; availability
//! resolution never sees malformed data.

use std::collections::BTreeSet;

use crate::error::{Result, SherpaError};

use super::recipe::{MethodKind, Recipe};
use super::template::{placeholders, KNOWN_PLACEHOLDERS};
use super::Catalog;

const FAMILY_KEYS: &[&str] = &["apt", "dnf", "pacman", "apk", "zypper"];

/// Validate every recipe and cross-recipe reference in the catalog.
pub fn validate(catalog: &Catalog) -> Result<()> {
    for recipe in catalog.tools() {
        validate_recipe(recipe)?;
        validate_manager_targets(catalog, recipe)?;
    }
    Ok(())
}

/// Check that every install-dependency tool id referenced by the handler
/// registry resolves to a recipe. A dangling reference is rejected at
/// load time rather than surfacing as a chain failure mid-remediation.
pub fn validate_references(catalog: &Catalog, referenced: &BTreeSet<String>) -> Result<()> {
    for tool in referenced {
        if catalog.get(tool).is_none() {
            return Err(SherpaError::CatalogValidation {
                message: format!(
                    "handler registry references tool '{}' which has no recipe",
                    tool
                ),
            });
        }
    }
    Ok(())
}

fn validate_recipe(recipe: &Recipe) -> Result<()> {
    let fail = |message: String| -> Result<()> {
        Err(SherpaError::CatalogValidation {
            message: format!("recipe '{}': {}", recipe.tool, message),
        })
    };

    if recipe.methods.is_empty() {
        return fail("no install methods declared".into());
    }
    if recipe.prefer.is_empty() {
        return fail("empty preference order".into());
    }

    // prefer must be a permutation of the method names: the order is
    // authoritative and total, so nothing may be chosen outside it.
    let mut seen = BTreeSet::new();
    for name in &recipe.prefer {
        if !recipe.methods.contains_key(name) {
            return fail(format!("prefer lists unknown method '{}'", name));
        }
        if !seen.insert(name.as_str()) {
            return fail(format!("prefer lists method '{}' twice", name));
        }
    }
    for name in recipe.methods.keys() {
        if !seen.contains(name.as_str()) {
            return fail(format!("method '{}' missing from prefer", name));
        }
    }

    for (name, spec) in &recipe.methods {
        let mut templates: Vec<&str> = vec![&spec.command];
        templates.extend(spec.os_command.values().map(String::as_str));
        if let Some(url) = spec.url() {
            templates.push(url);
        }
        for template in templates {
            for placeholder in placeholders(template) {
                if !KNOWN_PLACEHOLDERS.contains(&placeholder) {
                    return fail(format!(
                        "method '{}' uses unknown placeholder '{}'",
                        name, placeholder
                    ));
                }
            }
        }

        for family in spec.requires.packages.keys() {
            if !FAMILY_KEYS.contains(&family.as_str()) {
                return fail(format!(
                    "method '{}' requires packages for unknown family '{}'",
                    name, family
                ));
            }
        }
    }

    Ok(())
}

/// A method installed through a manager that the catalog knows how to
/// install must point at an existing recipe, or chains cannot unlock it.
fn validate_manager_targets(catalog: &Catalog, recipe: &Recipe) -> Result<()> {
    for (name, spec) in &recipe.methods {
        if let MethodKind::Manager { manager, .. } = &spec.kind {
            if let Some(tool) = manager.catalog_tool() {
                if catalog.get(tool).is_none() {
                    return Err(SherpaError::CatalogValidation {
                        message: format!(
                            "recipe '{}' method '{}' installs via {} but tool '{}' has no recipe",
                            recipe.tool, name, manager, tool
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}
