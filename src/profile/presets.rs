//! Named system presets.
//!
//! Frozen [`SystemProfile`] values for the machines Sherpa commonly
//! targets. Used by the coverage tests, the worked examples in the
//! integration suite, and the `--preset` flag on `plan` and `diagnose`,
//! which lets a resolution be replayed against a machine other than the
//! one running the command.

use std::collections::BTreeSet;

use super::{Architecture, LanguageEnv, NativePm, OsFamily, SystemProfile};

/// Preset names accepted by `--preset`, in display order.
pub const NAMES: &[&str] = &[
    "ubuntu",
    "debian-container",
    "fedora",
    "arch",
    "alpine",
    "alpine-readonly",
    "opensuse",
    "macos",
    "ubuntu-nosudo",
    "wsl",
];

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<SystemProfile> {
    let profile = match name {
        "ubuntu" => ubuntu(),
        "debian-container" => debian_container(),
        "fedora" => fedora(),
        "arch" => arch(),
        "alpine" => alpine(),
        "alpine-readonly" => alpine_readonly(),
        "opensuse" => opensuse(),
        "macos" => macos(),
        "ubuntu-nosudo" => ubuntu_nosudo(),
        "wsl" => wsl(),
        _ => return None,
    };
    Some(profile)
}

/// All presets with their names, for enumeration in tests.
pub fn all() -> Vec<(&'static str, SystemProfile)> {
    NAMES
        .iter()
        .map(|name| (*name, by_name(name).expect("preset names stay in sync")))
        .collect()
}

fn binaries(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn managers(pms: &[NativePm]) -> BTreeSet<NativePm> {
    pms.iter().copied().collect()
}

/// Stock Ubuntu desktop: apt, sudo user, systemd, writable root.
pub fn ubuntu() -> SystemProfile {
    SystemProfile {
        os: OsFamily::Debian,
        is_wsl: false,
        in_container: false,
        package_managers: managers(&[NativePm::Apt]),
        arch: Architecture::new("x86_64"),
        has_sudo: true,
        is_root: false,
        fs_writable: true,
        has_systemd: true,
        language_env: LanguageEnv {
            python_externally_managed: true,
            virtualenv_active: false,
        },
        installed_binaries: binaries(&[
            "apt-get", "snap", "curl", "wget", "git", "tar", "unzip", "python3", "sudo",
            "systemctl", "sh", "bash",
        ]),
    }
}

/// Minimal Debian container: root, no sudo binary, no systemd, no curl.
pub fn debian_container() -> SystemProfile {
    SystemProfile {
        os: OsFamily::Debian,
        is_wsl: false,
        in_container: true,
        package_managers: managers(&[NativePm::Apt]),
        arch: Architecture::new("x86_64"),
        has_sudo: false,
        is_root: true,
        fs_writable: true,
        has_systemd: false,
        language_env: LanguageEnv::default(),
        installed_binaries: binaries(&["apt-get", "tar", "sh", "bash"]),
    }
}

/// Fedora workstation: dnf, sudo user, systemd.
pub fn fedora() -> SystemProfile {
    SystemProfile {
        os: OsFamily::RedHat,
        is_wsl: false,
        in_container: false,
        package_managers: managers(&[NativePm::Dnf]),
        arch: Architecture::new("x86_64"),
        has_sudo: true,
        is_root: false,
        fs_writable: true,
        has_systemd: true,
        language_env: LanguageEnv::default(),
        installed_binaries: binaries(&[
            "dnf", "curl", "git", "tar", "unzip", "python3", "sudo", "systemctl", "sh", "bash",
        ]),
    }
}

/// Arch: pacman, sudo user, systemd.
pub fn arch() -> SystemProfile {
    SystemProfile {
        os: OsFamily::Arch,
        is_wsl: false,
        in_container: false,
        package_managers: managers(&[NativePm::Pacman]),
        arch: Architecture::new("x86_64"),
        has_sudo: true,
        is_root: false,
        fs_writable: true,
        has_systemd: true,
        language_env: LanguageEnv::default(),
        installed_binaries: binaries(&[
            "pacman", "curl", "git", "tar", "python3", "sudo", "systemctl", "sh", "bash",
            "cargo", "go",
        ]),
    }
}

/// Alpine container: apk, root, busybox-ish userland, no systemd.
pub fn alpine() -> SystemProfile {
    SystemProfile {
        os: OsFamily::Alpine,
        is_wsl: false,
        in_container: true,
        package_managers: managers(&[NativePm::Apk]),
        arch: Architecture::new("x86_64"),
        has_sudo: false,
        is_root: true,
        fs_writable: true,
        has_systemd: false,
        language_env: LanguageEnv::default(),
        installed_binaries: binaries(&["apk", "wget", "tar", "sh"]),
    }
}

/// Alpine with a read-only root filesystem (e.g. hardened deploys).
pub fn alpine_readonly() -> SystemProfile {
    SystemProfile {
        fs_writable: false,
        ..alpine()
    }
}

/// openSUSE Tumbleweed: zypper, sudo user, systemd.
pub fn opensuse() -> SystemProfile {
    SystemProfile {
        os: OsFamily::Suse,
        is_wsl: false,
        in_container: false,
        package_managers: managers(&[NativePm::Zypper]),
        arch: Architecture::new("x86_64"),
        has_sudo: true,
        is_root: false,
        fs_writable: true,
        has_systemd: true,
        language_env: LanguageEnv::default(),
        installed_binaries: binaries(&[
            "zypper", "curl", "git", "tar", "python3", "sudo", "systemctl", "sh", "bash",
        ]),
    }
}

/// Apple Silicon macOS with Homebrew already present.
pub fn macos() -> SystemProfile {
    SystemProfile {
        os: OsFamily::MacOs,
        is_wsl: false,
        in_container: false,
        package_managers: managers(&[]),
        arch: Architecture::new("arm64"),
        has_sudo: true,
        is_root: false,
        fs_writable: true,
        has_systemd: false,
        language_env: LanguageEnv::default(),
        installed_binaries: binaries(&[
            "brew", "curl", "git", "tar", "unzip", "python3", "sudo", "sh", "bash",
        ]),
    }
}

/// Ubuntu where the user has no sudo rights and sudo is absent.
pub fn ubuntu_nosudo() -> SystemProfile {
    SystemProfile {
        has_sudo: false,
        installed_binaries: binaries(&[
            "apt-get", "curl", "wget", "git", "tar", "unzip", "python3", "systemctl", "sh",
            "bash",
        ]),
        ..ubuntu()
    }
}

/// Ubuntu under WSL2: apt, sudo, no systemd by default.
pub fn wsl() -> SystemProfile {
    SystemProfile {
        is_wsl: true,
        has_systemd: false,
        ..ubuntu()
    }
}
