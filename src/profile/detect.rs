//! Live system detection.
//!
//! Builds a [`SystemProfile`] by probing the filesystem and PATH. All
//! probes are cheap and read-only; the snapshot is taken once and the
//! live system is never re-queried during resolution.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::{Architecture, LanguageEnv, NativePm, OsFamily, SystemProfile};

/// Binaries worth recording in the snapshot: native and installable
/// managers, common prerequisites, and the tools recipes reach for.
const PROBED_BINARIES: &[&str] = &[
    "apt-get", "dnf", "yum", "pacman", "apk", "zypper", "snap", "brew", "cargo", "npm", "pipx",
    "gem", "go", "curl", "wget", "git", "tar", "unzip", "python3", "sudo", "systemctl", "sh",
    "bash",
];

pub fn detect() -> SystemProfile {
    let os = detect_os_family();
    let installed_binaries = probe_binaries();
    let package_managers = native_managers(&installed_binaries);
    let is_root = detect_root();

    SystemProfile {
        os,
        is_wsl: detect_wsl(),
        in_container: detect_container(),
        package_managers,
        arch: Architecture::new(std::env::consts::ARCH),
        has_sudo: installed_binaries.contains("sudo"),
        is_root,
        fs_writable: detect_fs_writable(is_root),
        has_systemd: Path::new("/run/systemd/system").exists(),
        language_env: detect_language_env(),
        installed_binaries,
    }
}

fn detect_os_family() -> OsFamily {
    if cfg!(target_os = "macos") {
        return OsFamily::MacOs;
    }

    let Ok(contents) = fs::read_to_string("/etc/os-release") else {
        return OsFamily::UnknownLinux;
    };
    classify_os_release(&contents)
}

/// Classify an os-release document by ID and ID_LIKE.
fn classify_os_release(contents: &str) -> OsFamily {
    let mut id = String::new();
    let mut id_like = String::new();
    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("ID=") {
            id = value.trim_matches('"').to_string();
        } else if let Some(value) = line.strip_prefix("ID_LIKE=") {
            id_like = value.trim_matches('"').to_string();
        }
    }

    let matches_any = |needle: &str| {
        id == needle || id_like.split_whitespace().any(|part| part == needle)
    };

    if matches_any("debian") || matches_any("ubuntu") {
        OsFamily::Debian
    } else if matches_any("fedora") || matches_any("rhel") || matches_any("centos") {
        OsFamily::RedHat
    } else if matches_any("arch") {
        OsFamily::Arch
    } else if matches_any("alpine") {
        OsFamily::Alpine
    } else if matches_any("suse") || matches_any("opensuse") {
        OsFamily::Suse
    } else {
        OsFamily::UnknownLinux
    }
}

fn detect_wsl() -> bool {
    fs::read_to_string("/proc/version")
        .map(|v| v.to_lowercase().contains("microsoft"))
        .unwrap_or(false)
}

fn detect_container() -> bool {
    Path::new("/.dockerenv").exists() || Path::new("/run/.containerenv").exists()
}

fn detect_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// System install prefixes count as writable when the root mount is not
/// `ro` and the prefix itself accepts writes for this user.
fn detect_fs_writable(is_root: bool) -> bool {
    if root_mounted_readonly() {
        return false;
    }
    if is_root {
        return true;
    }
    ["/usr/local/bin", "/usr/local", "/usr/bin"]
        .iter()
        .find(|p| Path::new(p).exists())
        .map(|p| path_writable(p))
        .unwrap_or(true)
}

#[cfg(unix)]
fn path_writable(path: &str) -> bool {
    let Ok(cpath) = std::ffi::CString::new(path) else {
        return false;
    };
    // SAFETY: cpath is a valid NUL-terminated string for the call.
    unsafe { libc::access(cpath.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn path_writable(path: &str) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

fn root_mounted_readonly() -> bool {
    let Ok(mounts) = fs::read_to_string("/proc/mounts") else {
        return false;
    };
    for line in mounts.lines() {
        let mut fields = line.split_whitespace();
        let (Some(_dev), Some(mountpoint), Some(_fstype), Some(opts)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if mountpoint == "/" {
            return opts.split(',').any(|o| o == "ro");
        }
    }
    false
}

fn detect_language_env() -> LanguageEnv {
    LanguageEnv {
        python_externally_managed: python_externally_managed(),
        virtualenv_active: std::env::var_os("VIRTUAL_ENV").is_some(),
    }
}

/// PEP 668: distros place an EXTERNALLY-MANAGED marker next to the
/// stdlib to make bare `pip install` refuse.
fn python_externally_managed() -> bool {
    for libdir in ["/usr/lib", "/usr/local/lib"] {
        let Ok(entries) = fs::read_dir(libdir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("python3") && entry.path().join("EXTERNALLY-MANAGED").is_file() {
                return true;
            }
        }
    }
    false
}

fn probe_binaries() -> BTreeSet<String> {
    PROBED_BINARIES
        .iter()
        .filter(|name| binary_on_path(name))
        .map(|name| name.to_string())
        .collect()
}

fn native_managers(binaries: &BTreeSet<String>) -> BTreeSet<NativePm> {
    NativePm::all()
        .iter()
        .copied()
        .filter(|pm| binaries.contains(pm.binary()))
        .collect()
}

/// Look for an executable file named `name` on PATH.
fn binary_on_path(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_ubuntu() {
        let contents = "ID=ubuntu\nID_LIKE=debian\nVERSION_ID=\"24.04\"\n";
        assert_eq!(classify_os_release(contents), OsFamily::Debian);
    }

    #[test]
    fn classify_fedora() {
        let contents = "ID=fedora\nVERSION_ID=41\n";
        assert_eq!(classify_os_release(contents), OsFamily::RedHat);
    }

    #[test]
    fn classify_rocky_via_id_like() {
        let contents = "ID=rocky\nID_LIKE=\"rhel centos fedora\"\n";
        assert_eq!(classify_os_release(contents), OsFamily::RedHat);
    }

    #[test]
    fn classify_alpine() {
        let contents = "ID=alpine\nVERSION_ID=3.20.0\n";
        assert_eq!(classify_os_release(contents), OsFamily::Alpine);
    }

    #[test]
    fn classify_manjaro_via_id_like() {
        let contents = "ID=manjaro\nID_LIKE=arch\n";
        assert_eq!(classify_os_release(contents), OsFamily::Arch);
    }

    #[test]
    fn classify_unknown_falls_through() {
        let contents = "ID=gentoo\n";
        assert_eq!(classify_os_release(contents), OsFamily::UnknownLinux);
    }

    #[test]
    fn detect_produces_consistent_managers() {
        let profile = detect();
        // Every recorded native manager must also be in installed_binaries.
        for pm in &profile.package_managers {
            assert!(profile.installed_binaries.contains(pm.binary()));
        }
    }

    #[test]
    fn binary_on_path_finds_sh() {
        if cfg!(unix) {
            assert!(binary_on_path("sh"));
        }
    }

    #[test]
    fn binary_on_path_misses_nonsense() {
        assert!(!binary_on_path("sherpa-test-nonexistent-binary"));
    }
}
