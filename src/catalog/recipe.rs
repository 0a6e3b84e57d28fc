//! Recipe data model.
//!
//! A [`Recipe`] describes every way a tool can be installed. Each
//! [`MethodSpec`] carries a strongly-typed [`MethodKind`] so the
//! availability gates can be matched exhaustively instead of sniffing
//! optional fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::{NativePm, OsFamily, ToolManager};

/// One tool's install definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Tool id used on the command line (`sherpa install <tool>`).
    pub tool: String,
    /// Binary the tool puts on PATH (may differ from the id, e.g. `rg`).
    pub bin: String,
    #[serde(default)]
    pub summary: String,
    /// Pinned version for download URLs, where the recipe needs one.
    #[serde(default)]
    pub version: Option<String>,
    pub methods: BTreeMap<String, MethodSpec>,
    /// Authoritative, total preference order over `methods`.
    pub prefer: Vec<String>,
}

impl Recipe {
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.get(name)
    }
}

/// What kind of installer a method is. The kind decides which availability
/// gates apply and which failure-handler tables the matcher consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodKind {
    /// Distro package manager install (`apt-get install ...`).
    Native { pm: NativePm, package: String },
    /// Snap package; needs systemd on the host.
    Snap {
        package: String,
        #[serde(default)]
        classic: bool,
    },
    /// Install through a manager that may itself be missing
    /// (brew, cargo, npm, pipx, gem, go).
    Manager {
        manager: ToolManager,
        package: String,
    },
    /// Piped script installer (`curl -fsSL <url> | sh`).
    Script { url: String },
    /// Direct release-archive download.
    Download { url: String },
}

/// Prerequisites a method needs before its command can work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requires {
    /// Binaries that must be on PATH (e.g. `curl`, `tar`).
    #[serde(default)]
    pub binaries: Vec<String>,
    /// Build/runtime packages per package-manager family, keyed by
    /// `apt`/`dnf`/`pacman`/`apk`/`zypper`.
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<String>>,
}

/// One concrete way to install a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSpec {
    #[serde(flatten)]
    pub kind: MethodKind,
    /// Command template. Placeholders: `{package}`, `{url}`, `{arch}`,
    /// `{os}`, `{bin}`, `{version}`.
    pub command: String,
    #[serde(default)]
    pub needs_sudo: bool,
    #[serde(default)]
    pub requires: Requires,
    /// Raw architecture -> template token. Empty means pass the raw
    /// value through unchanged.
    #[serde(default)]
    pub arch_map: BTreeMap<String, String>,
    /// Per-OS command overrides.
    #[serde(default)]
    pub os_command: BTreeMap<OsFamily, String>,
}

/// Which shared method-family handler table a method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FamilyTag {
    Pm(NativePm),
    Snap,
}

/// Which shared ecosystem handler table a method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcoTag {
    Manager(ToolManager),
    Script,
    Download,
}

impl MethodSpec {
    /// Method-family table this method's failures consult, if any.
    pub fn family_tag(&self) -> Option<FamilyTag> {
        match &self.kind {
            MethodKind::Native { pm, .. } => Some(FamilyTag::Pm(*pm)),
            MethodKind::Snap { .. } => Some(FamilyTag::Snap),
            _ => None,
        }
    }

    /// Ecosystem table this method's failures consult, if any.
    pub fn eco_tag(&self) -> Option<EcoTag> {
        match &self.kind {
            MethodKind::Manager { manager, .. } => Some(EcoTag::Manager(*manager)),
            MethodKind::Script { .. } => Some(EcoTag::Script),
            MethodKind::Download { .. } => Some(EcoTag::Download),
            _ => None,
        }
    }

    /// Whether the method installs into system prefixes. Manager methods
    /// land in the user home and survive a read-only root.
    pub fn writes_system_paths(&self) -> bool {
        !matches!(self.kind, MethodKind::Manager { .. })
    }

    /// Package name carried by the kind, if it has one.
    pub fn package(&self) -> Option<&str> {
        match &self.kind {
            MethodKind::Native { package, .. }
            | MethodKind::Snap { package, .. }
            | MethodKind::Manager { package, .. } => Some(package),
            _ => None,
        }
    }

    /// URL carried by the kind, if it has one.
    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            MethodKind::Script { url } | MethodKind::Download { url } => Some(url),
            _ => None,
        }
    }
}
