//! Availability resolution.
//!
//! Computes, for one (recipe, method, profile) triple, whether the method
//! is usable right now, blocked behind a prerequisite install, or
//! structurally impossible on this system. Pure function of its inputs;
//! nothing is cached across profile changes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::{Catalog, MethodKind, MethodSpec, Recipe};
use crate::error::{Result, SherpaError};
use crate::profile::{NativePm, SystemProfile};

/// Why a method can never work on this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum ImpossibleReason {
    /// The method's package manager is not on this system.
    PackageManagerMissing(NativePm),
    /// The method needs an init system (snapd) the host does not run.
    NoInitSystem,
    /// The method writes system prefixes and the root filesystem is
    /// read-only.
    ReadOnlyFilesystem,
    /// The method declares an architecture map with no entry for this CPU.
    UnsupportedArchitecture(String),
}

impl fmt::Display for ImpossibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpossibleReason::PackageManagerMissing(pm) => {
                write!(f, "package manager '{}' not present", pm)
            }
            ImpossibleReason::NoInitSystem => {
                write!(f, "no init system for the snap daemon")
            }
            ImpossibleReason::ReadOnlyFilesystem => write!(f, "read-only root filesystem"),
            ImpossibleReason::UnsupportedArchitecture(arch) => {
                write!(f, "unsupported architecture '{}'", arch)
            }
        }
    }
}

/// The prerequisite that would unlock a `Locked` method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockAction {
    /// Binary that must appear on PATH first.
    pub binary: String,
    /// Catalog tool that provides it, when one exists.
    pub tool: Option<String>,
    /// Instruction shown when no recipe can install it.
    pub hint: String,
}

/// Whether a method can be used on a given system right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum AvailabilityStatus {
    /// Usable as-is.
    Ready,
    /// Usable once a prerequisite is installed.
    Locked { unlock: UnlockAction },
    /// Structurally unusable on this system.
    Impossible {
        #[serde(flatten)]
        reason: ImpossibleReason,
    },
}

impl AvailabilityStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, AvailabilityStatus::Ready)
    }

    pub fn is_impossible(&self) -> bool {
        matches!(self, AvailabilityStatus::Impossible { .. })
    }

    fn locked(binary: &str, tool: Option<&str>, hint: String) -> Self {
        AvailabilityStatus::Locked {
            unlock: UnlockAction {
                binary: binary.to_string(),
                tool: tool.map(str::to_string),
                hint,
            },
        }
    }

    fn impossible(reason: ImpossibleReason) -> Self {
        AvailabilityStatus::Impossible { reason }
    }
}

/// Resolve one method's availability. Gates apply in priority order and
/// the first hit wins.
pub fn resolve(
    recipe: &Recipe,
    method_name: &str,
    profile: &SystemProfile,
    catalog: &Catalog,
) -> Result<AvailabilityStatus> {
    let spec = recipe
        .method(method_name)
        .ok_or_else(|| SherpaError::UnknownMethod {
            tool: recipe.tool.clone(),
            method: method_name.to_string(),
        })?;
    Ok(resolve_spec(spec, profile, catalog))
}

/// Resolve every method of a recipe against one profile.
pub fn resolve_all(
    recipe: &Recipe,
    profile: &SystemProfile,
    catalog: &Catalog,
) -> BTreeMap<String, AvailabilityStatus> {
    recipe
        .methods
        .iter()
        .map(|(name, spec)| (name.clone(), resolve_spec(spec, profile, catalog)))
        .collect()
}

fn resolve_spec(
    spec: &MethodSpec,
    profile: &SystemProfile,
    catalog: &Catalog,
) -> AvailabilityStatus {
    // 1. Native package manager must exist on the system.
    if let MethodKind::Native { pm, .. } = &spec.kind {
        if !profile.has_pm(*pm) {
            return AvailabilityStatus::impossible(ImpossibleReason::PackageManagerMissing(*pm));
        }
    }

    // 2. An installable manager that is absent locks the method behind
    //    installing the manager itself.
    if let MethodKind::Manager { manager, .. } = &spec.kind {
        if !profile.has_binary(manager.binary()) {
            let tool = manager.catalog_tool();
            let hint = match tool {
                Some(tool) => format!("install '{}' first", tool),
                None => format!("install {} and re-run", manager),
            };
            return AvailabilityStatus::locked(manager.binary(), tool, hint);
        }
    }

    // 3. Snaps need a live snapd, which needs systemd outside containers.
    if matches!(spec.kind, MethodKind::Snap { .. })
        && (!profile.has_systemd || profile.in_container)
    {
        return AvailabilityStatus::impossible(ImpossibleReason::NoInitSystem);
    }

    // 4. Required binaries lock until installed.
    for binary in &spec.requires.binaries {
        if !profile.has_binary(binary) {
            let tool = catalog.tool_providing(binary).map(|r| r.tool.as_str());
            let hint = match tool {
                Some(tool) => format!("install '{}' first", tool),
                None => format!("install '{}' and re-run", binary),
            };
            return AvailabilityStatus::locked(binary, tool, hint);
        }
    }

    // 5. System-prefix installs cannot work on a read-only root.
    if spec.writes_system_paths() && !profile.fs_writable {
        return AvailabilityStatus::impossible(ImpossibleReason::ReadOnlyFilesystem);
    }

    // 6. A declared arch map with no entry for this CPU is terminal; an
    //    empty map passes the raw value through.
    if !spec.arch_map.is_empty() && !spec.arch_map.contains_key(&profile.arch.raw) {
        return AvailabilityStatus::impossible(ImpossibleReason::UnsupportedArchitecture(
            profile.arch.raw.clone(),
        ));
    }

    AvailabilityStatus::Ready
}
