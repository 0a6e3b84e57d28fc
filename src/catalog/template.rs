//! Command template rendering.
//!
//! Recipe commands are templates with `{placeholder}` slots filled from
//! the method, the recipe, and the system profile. An unknown placeholder
//! is a configuration error, never an availability value.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, SherpaError};
use crate::profile::SystemProfile;

use super::recipe::{MethodSpec, Recipe};

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Placeholder names templates may use.
pub const KNOWN_PLACEHOLDERS: &[&str] = &["package", "url", "arch", "os", "bin", "version"];

/// Render the install command for a method against a profile.
///
/// Applies the per-OS override when one exists, then substitutes
/// placeholders. The `{arch}` token goes through the method's `arch_map`;
/// an empty map passes the raw architecture through.
pub fn render_command(
    recipe: &Recipe,
    method_name: &str,
    spec: &MethodSpec,
    profile: &SystemProfile,
) -> Result<String> {
    let base = spec
        .os_command
        .get(&profile.os)
        .map(String::as_str)
        .unwrap_or(&spec.command);

    // URLs may themselves contain placeholders; resolve them first.
    let url = match spec.url() {
        Some(url) => Some(substitute(url, method_name, recipe, spec, profile, None)?),
        None => None,
    };

    substitute(base, method_name, recipe, spec, profile, url.as_deref())
}

/// Prefix `sudo` when the method needs elevation and we are not root.
pub fn elevate(command: &str, spec: &MethodSpec, profile: &SystemProfile) -> String {
    if spec.needs_sudo && !profile.is_root {
        format!("sudo {}", command)
    } else {
        command.to_string()
    }
}

/// Install command for prerequisite packages the method declares for
/// this system's package-manager family, if any.
pub fn prerequisite_command(spec: &MethodSpec, profile: &SystemProfile) -> Option<String> {
    let (pm, packages) = profile.package_managers.iter().find_map(|pm| {
        spec.requires
            .packages
            .get(pm.family_key())
            .filter(|packages| !packages.is_empty())
            .map(|packages| (*pm, packages))
    })?;
    let command = format!("{} {}", pm.install_command(), packages.join(" "));
    if profile.is_root {
        Some(command)
    } else {
        Some(format!("sudo {}", command))
    }
}

/// The complete, executable install command: prerequisite packages
/// first, then the rendered and (when needed) elevated method command.
pub fn install_command(
    recipe: &Recipe,
    method_name: &str,
    spec: &MethodSpec,
    profile: &SystemProfile,
) -> Result<String> {
    let rendered = render_command(recipe, method_name, spec, profile)?;
    let main = elevate(&rendered, spec, profile);
    Ok(match prerequisite_command(spec, profile) {
        Some(prereq) => format!("{} && {}", prereq, main),
        None => main,
    })
}

fn substitute(
    template: &str,
    method_name: &str,
    recipe: &Recipe,
    spec: &MethodSpec,
    profile: &SystemProfile,
    url: Option<&str>,
) -> Result<String> {
    let arch = spec
        .arch_map
        .get(&profile.arch.raw)
        .map(String::as_str)
        .unwrap_or(&profile.arch.raw);

    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in RE_PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).unwrap();
        let name = caps.get(1).unwrap().as_str();
        out.push_str(&template[last..whole.start()]);

        let value = match name {
            "package" => spec.package().map(str::to_string),
            "url" => url.map(str::to_string),
            "arch" => Some(arch.to_string()),
            "os" => Some(profile.os.token().to_string()),
            "bin" => Some(recipe.bin.clone()),
            "version" => recipe.version.clone(),
            _ => None,
        };

        match value {
            Some(value) => out.push_str(&value),
            None => {
                return Err(SherpaError::Template {
                    method: method_name.to_string(),
                    placeholder: name.to_string(),
                })
            }
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Placeholder names used by a template, for load-time validation.
pub fn placeholders(template: &str) -> Vec<&str> {
    RE_PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect()
}
