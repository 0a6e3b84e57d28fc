//! System profile model.
//!
//! A [`SystemProfile`] is an immutable snapshot of the facts resolution
//! depends on: OS family, native package managers, CPU architecture,
//! sudo/root state, filesystem writability, language-runtime markers, and
//! which well-known binaries are on PATH. It is produced once per run,
//! either detected live ([`SystemProfile::detect`]) or taken from a named
//! preset ([`presets`]), and never re-queried mid-resolution.

mod detect;
pub mod presets;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Operating system family, at the granularity install commands differ.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    /// Debian, Ubuntu, and derivatives (apt).
    Debian,
    /// Fedora, RHEL, CentOS, and derivatives (dnf/yum).
    #[serde(rename = "redhat")]
    RedHat,
    /// Arch and derivatives (pacman).
    Arch,
    /// Alpine (apk).
    Alpine,
    /// openSUSE and SLES (zypper).
    Suse,
    /// macOS.
    #[serde(rename = "macos")]
    MacOs,
    /// A Linux we could not classify further.
    UnknownLinux,
}

impl OsFamily {
    /// Token substituted for `{os}` in command templates.
    pub fn token(&self) -> &'static str {
        match self {
            OsFamily::MacOs => "darwin",
            _ => "linux",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Debian => "debian",
            OsFamily::RedHat => "redhat",
            OsFamily::Arch => "arch",
            OsFamily::Alpine => "alpine",
            OsFamily::Suse => "suse",
            OsFamily::MacOs => "macos",
            OsFamily::UnknownLinux => "linux",
        };
        write!(f, "{}", name)
    }
}

/// A native (distro-shipped) package manager.
///
/// Native managers are facts about the system: a method that needs one is
/// structurally impossible where it is absent. Contrast [`ToolManager`],
/// which can itself be installed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NativePm {
    Apt,
    Dnf,
    Pacman,
    Apk,
    Zypper,
}

impl NativePm {
    /// The binary probed for on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            NativePm::Apt => "apt-get",
            NativePm::Dnf => "dnf",
            NativePm::Pacman => "pacman",
            NativePm::Apk => "apk",
            NativePm::Zypper => "zypper",
        }
    }

    /// Key used for this family in recipe files (`packages:` maps).
    pub fn family_key(&self) -> &'static str {
        match self {
            NativePm::Apt => "apt",
            NativePm::Dnf => "dnf",
            NativePm::Pacman => "pacman",
            NativePm::Apk => "apk",
            NativePm::Zypper => "zypper",
        }
    }

    /// All known native managers.
    pub fn all() -> &'static [NativePm] {
        &[
            NativePm::Apt,
            NativePm::Dnf,
            NativePm::Pacman,
            NativePm::Apk,
            NativePm::Zypper,
        ]
    }

    /// Install-command prefix for this family.
    pub fn install_command(&self) -> &'static str {
        match self {
            NativePm::Apt => "apt-get install -y",
            NativePm::Dnf => "dnf install -y",
            NativePm::Pacman => "pacman -S --noconfirm",
            NativePm::Apk => "apk add",
            NativePm::Zypper => "zypper install -y",
        }
    }

    /// Refresh-the-index command, where the family has one.
    pub fn update_command(&self) -> Option<&'static str> {
        match self {
            NativePm::Apt => Some("sudo apt-get update"),
            NativePm::Dnf => None,
            NativePm::Pacman => Some("sudo pacman -Sy"),
            NativePm::Apk => Some("sudo apk update"),
            NativePm::Zypper => Some("sudo zypper refresh"),
        }
    }
}

impl fmt::Display for NativePm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family_key())
    }
}

/// An installable manager: a tool that installs other tools but must itself
/// be present first (Homebrew, cargo, npm, pipx, gem, go).
///
/// Absence of one of these never makes a method impossible; it makes the
/// method locked behind installing the manager.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ToolManager {
    Brew,
    Cargo,
    Npm,
    Pipx,
    Gem,
    Go,
}

impl ToolManager {
    /// The binary probed for on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            ToolManager::Brew => "brew",
            ToolManager::Cargo => "cargo",
            ToolManager::Npm => "npm",
            ToolManager::Pipx => "pipx",
            ToolManager::Gem => "gem",
            ToolManager::Go => "go",
        }
    }

    /// Catalog tool id that installs this manager, where one exists.
    pub fn catalog_tool(&self) -> Option<&'static str> {
        match self {
            ToolManager::Brew => Some("brew"),
            ToolManager::Pipx => Some("pipx"),
            _ => None,
        }
    }
}

impl fmt::Display for ToolManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// CPU architecture, raw and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// As reported by the system (e.g. `x86_64`, `aarch64`).
    pub raw: String,
    /// Canonical name used for display and pass-through substitution
    /// (`amd64`, `arm64`, `arm`, `386`, or the raw value).
    pub normalized: String,
}

impl Architecture {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = match raw.as_str() {
            "x86_64" | "amd64" => "amd64",
            "aarch64" | "arm64" => "arm64",
            "armv7l" | "armv6l" => "arm",
            "i686" | "i386" => "386",
            other => other,
        }
        .to_string();
        Self { raw, normalized }
    }
}

/// Language-runtime environment facts that gate ecosystem installers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEnv {
    /// A PEP 668 `EXTERNALLY-MANAGED` marker is present next to the
    /// system Python; bare `pip install` will refuse.
    pub python_externally_managed: bool,
    /// A virtualenv is active in this shell.
    pub virtualenv_active: bool,
}

/// Immutable snapshot of the system facts resolution runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemProfile {
    pub os: OsFamily,
    pub is_wsl: bool,
    pub in_container: bool,
    pub package_managers: BTreeSet<NativePm>,
    pub arch: Architecture,
    pub has_sudo: bool,
    pub is_root: bool,
    /// Whether system install prefixes (`/usr`, `/usr/local`) are writable.
    pub fs_writable: bool,
    pub has_systemd: bool,
    pub language_env: LanguageEnv,
    pub installed_binaries: BTreeSet<String>,
}

impl SystemProfile {
    /// Detect the live system. Runs once per invocation.
    pub fn detect() -> Self {
        detect::detect()
    }

    /// Whether `name` was found on PATH at snapshot time.
    pub fn has_binary(&self, name: &str) -> bool {
        self.installed_binaries.contains(name)
    }

    /// Whether the native manager is present.
    pub fn has_pm(&self, pm: NativePm) -> bool {
        self.package_managers.contains(&pm)
    }

    /// Whether commands can be elevated (root already, or sudo available).
    pub fn can_elevate(&self) -> bool {
        self.is_root || self.has_sudo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn architecture_normalizes_x86_64() {
        let arch = Architecture::new("x86_64");
        assert_eq!(arch.raw, "x86_64");
        assert_eq!(arch.normalized, "amd64");
    }

    #[test]
    fn architecture_normalizes_aarch64() {
        assert_eq!(Architecture::new("aarch64").normalized, "arm64");
    }

    #[test]
    fn architecture_passes_unknown_through() {
        let arch = Architecture::new("riscv64");
        assert_eq!(arch.normalized, "riscv64");
    }

    #[test]
    fn os_token_is_darwin_on_macos() {
        assert_eq!(OsFamily::MacOs.token(), "darwin");
        assert_eq!(OsFamily::Debian.token(), "linux");
    }

    #[test]
    fn native_pm_binaries() {
        assert_eq!(NativePm::Apt.binary(), "apt-get");
        assert_eq!(NativePm::Apk.binary(), "apk");
    }

    #[test]
    fn tool_manager_catalog_mapping() {
        assert_eq!(ToolManager::Brew.catalog_tool(), Some("brew"));
        assert_eq!(ToolManager::Cargo.catalog_tool(), None);
    }

    #[test]
    fn profile_binary_lookup() {
        let profile = presets::by_name("ubuntu").unwrap();
        assert!(profile.has_binary("curl"));
        assert!(!profile.has_binary("definitely-not-installed"));
    }

    #[test]
    fn can_elevate_with_sudo_or_root() {
        let mut profile = presets::by_name("ubuntu").unwrap();
        assert!(profile.can_elevate());
        profile.has_sudo = false;
        profile.is_root = false;
        assert!(!profile.can_elevate());
    }

    #[test]
    fn profile_serializes_to_json() {
        let profile = presets::by_name("alpine").unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"apk\""));
    }
}
