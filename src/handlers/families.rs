//! Method-family failure handlers.
//!
//! One shared table per native package-manager family plus snap. Every
//! tool installed through that family reuses the same table; patterns
//! here know the family's commands but nothing about individual tools.

use std::collections::BTreeMap;

use crate::catalog::FamilyTag;
use crate::profile::NativePm;

use super::{lazy_regex, Category, HandlerEntry, RemediationOption, Strategy};

lazy_regex!(RE_APT_NO_PACKAGE, r"(?i)unable to locate package (\S+)");
lazy_regex!(
    RE_APT_DPKG_INTERRUPTED,
    r"(?i)dpkg was interrupted|dpkg --configure -a"
);
lazy_regex!(
    RE_APT_LOCK_HELD,
    r"(?i)could not get lock /var/lib/(dpkg|apt)"
);
lazy_regex!(RE_APT_HASH_MISMATCH, r"(?i)hash sum mismatch");
lazy_regex!(
    RE_APT_BROKEN_DEPS,
    r"(?i)unmet dependencies|held broken packages"
);
lazy_regex!(RE_APT_NO_PUBKEY, r"(?i)NO_PUBKEY ([0-9A-F]+)");
lazy_regex!(RE_DNF_NO_MATCH, r"(?i)no match for argument: (\S+)");
lazy_regex!(RE_DNF_GPG_FAILED, r"(?i)gpg check failed");
lazy_regex!(
    RE_DNF_METADATA,
    r"(?i)cannot download.*metadata|failed to download metadata"
);
lazy_regex!(RE_PACMAN_NOT_FOUND, r"(?i)target not found: (\S+)");
lazy_regex!(
    RE_PACMAN_KEYRING,
    r"(?i)signature from .* is (unknown trust|invalid)|invalid or corrupted package"
);
lazy_regex!(RE_PACMAN_DB_LOCK, r"(?i)unable to lock database");
lazy_regex!(
    RE_APK_NO_PACKAGE,
    r"(?i)unable to select packages|no such package"
);
lazy_regex!(RE_APK_UNTRUSTED, r"(?i)untrusted signature");
lazy_regex!(RE_ZYPPER_NOT_FOUND, r"(?i)not found in package names");
lazy_regex!(
    RE_SNAP_NOT_FOUND,
    r#"(?i)snap "([^"]+)" not found"#
);
lazy_regex!(
    RE_SNAP_SEEDING,
    r"(?i)too early for operation.*seed|system does not fully support snapd"
);

fn apt() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "apt_package_not_found",
            pattern: RE_APT_NO_PACKAGE.as_str(),
            category: Category::Dependency,
            sample: "E: Unable to locate package ripgrep",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: format!("sudo apt-get update && {}", ctx.command),
                    }),
                    RemediationOption::fallback(Strategy::AddRepository {
                        command: "sudo add-apt-repository universe".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "apt_dpkg_interrupted",
            pattern: RE_APT_DPKG_INTERRUPTED.as_str(),
            category: Category::Configuration,
            sample: "E: dpkg was interrupted, you must manually run 'sudo dpkg --configure -a'",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("sudo dpkg --configure -a && {}", ctx.command),
                })]
            },
        },
        HandlerEntry {
            name: "apt_lock_held",
            pattern: RE_APT_LOCK_HELD.as_str(),
            category: Category::Environment,
            sample: "E: Could not get lock /var/lib/dpkg/lock-frontend",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::ManualInstruction {
                        text: "Another apt/dpkg process is running; wait for it to finish"
                            .to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "apt_hash_mismatch",
            pattern: RE_APT_HASH_MISMATCH.as_str(),
            category: Category::Network,
            sample: "E: Failed to fetch ... Hash Sum mismatch",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!(
                        "sudo rm -rf /var/lib/apt/lists/* && sudo apt-get update && {}",
                        ctx.command
                    ),
                })]
            },
        },
        HandlerEntry {
            name: "apt_broken_deps",
            pattern: RE_APT_BROKEN_DEPS.as_str(),
            category: Category::Dependency,
            sample: "E: Unmet dependencies. Try 'apt --fix-broken install'",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("sudo apt-get install -f -y && {}", ctx.command),
                })]
            },
        },
        HandlerEntry {
            name: "apt_missing_pubkey",
            pattern: RE_APT_NO_PUBKEY.as_str(),
            category: Category::Configuration,
            sample: "W: GPG error: ... NO_PUBKEY 23F3D4EA75716059",
            options: |caps, _ctx| {
                let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                vec![RemediationOption::recommended(Strategy::AddRepository {
                    command: format!(
                        "sudo apt-key adv --keyserver keyserver.ubuntu.com --recv-keys {}",
                        key
                    ),
                })]
            },
        },
    ]
}

fn dnf() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "dnf_no_match",
            pattern: RE_DNF_NO_MATCH.as_str(),
            category: Category::Dependency,
            sample: "Error: No match for argument: ripgrep",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::AddRepository {
                        command: "sudo dnf install -y epel-release".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "dnf_gpg_failed",
            pattern: RE_DNF_GPG_FAILED.as_str(),
            category: Category::Configuration,
            sample: "GPG check FAILED",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "Refresh the repo GPG keys: sudo dnf --refresh makecache".to_string(),
                })]
            },
        },
        HandlerEntry {
            name: "dnf_metadata_download",
            pattern: RE_DNF_METADATA.as_str(),
            category: Category::Network,
            sample: "Failed to download metadata for repo 'updates'",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("sudo dnf clean all && {}", ctx.command),
                })]
            },
        },
    ]
}

fn pacman() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "pacman_target_not_found",
            pattern: RE_PACMAN_NOT_FOUND.as_str(),
            category: Category::Dependency,
            sample: "error: target not found: ripgrep",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("sudo pacman -Sy && {}", ctx.command),
                })]
            },
        },
        HandlerEntry {
            name: "pacman_keyring_stale",
            pattern: RE_PACMAN_KEYRING.as_str(),
            category: Category::Configuration,
            sample: "error: ripgrep: signature from \"...\" is unknown trust",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!(
                        "sudo pacman -Sy archlinux-keyring --noconfirm && {}",
                        ctx.command
                    ),
                })]
            },
        },
        HandlerEntry {
            name: "pacman_db_locked",
            pattern: RE_PACMAN_DB_LOCK.as_str(),
            category: Category::Environment,
            sample: "error: failed to init transaction (unable to lock database)",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "If no pacman is running, remove /var/lib/pacman/db.lck and retry"
                        .to_string(),
                })]
            },
        },
    ]
}

fn apk() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "apk_package_not_found",
            pattern: RE_APK_NO_PACKAGE.as_str(),
            category: Category::Dependency,
            sample: "ERROR: unable to select packages:\n  ripgrep (no such package)",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: format!("apk update && {}", ctx.command),
                    }),
                    RemediationOption::fallback(Strategy::AddRepository {
                        command: "echo 'https://dl-cdn.alpinelinux.org/alpine/latest-stable/community' >> /etc/apk/repositories"
                            .to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "apk_untrusted_signature",
            pattern: RE_APK_UNTRUSTED.as_str(),
            category: Category::Configuration,
            sample: "ERROR: ripgrep-14.1.1.apk: UNTRUSTED signature",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("apk add --update-cache alpine-keys && {}", ctx.command),
                })]
            },
        },
    ]
}

fn zypper() -> Vec<HandlerEntry> {
    vec![HandlerEntry {
        name: "zypper_not_found",
        pattern: RE_ZYPPER_NOT_FOUND.as_str(),
        category: Category::Dependency,
        sample: "'ripgrep' not found in package names. Trying capabilities.",
        options: |_caps, ctx| {
            vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                command: format!("sudo zypper refresh && {}", ctx.command),
            })]
        },
    }]
}

fn snap() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "snap_not_found",
            pattern: RE_SNAP_NOT_FOUND.as_str(),
            category: Category::Dependency,
            sample: "error: snap \"ripgrep\" not found",
            options: |caps, _ctx| {
                let package = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: format!("Search the store for the right name: snap find {}", package),
                })]
            },
        },
        HandlerEntry {
            name: "snap_not_seeded",
            pattern: RE_SNAP_SEEDING.as_str(),
            category: Category::Environment,
            sample: "error: too early for operation, device not yet seeded",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "snapd is still starting; check 'snap changes'".to_string(),
                    }),
                ]
            },
        },
    ]
}

/// All method-family tables, keyed by family tag.
pub fn entries() -> BTreeMap<FamilyTag, Vec<HandlerEntry>> {
    BTreeMap::from([
        (FamilyTag::Pm(NativePm::Apt), apt()),
        (FamilyTag::Pm(NativePm::Dnf), dnf()),
        (FamilyTag::Pm(NativePm::Pacman), pacman()),
        (FamilyTag::Pm(NativePm::Apk), apk()),
        (FamilyTag::Pm(NativePm::Zypper), zypper()),
        (FamilyTag::Snap, snap()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_native_family_has_a_table() {
        let tables = entries();
        for pm in NativePm::all() {
            assert!(
                tables.contains_key(&FamilyTag::Pm(*pm)),
                "no handler table for {}",
                pm
            );
        }
        assert!(tables.contains_key(&FamilyTag::Snap));
    }

    #[test]
    fn apt_not_found_recommends_index_refresh() {
        let tables = entries();
        let table = &tables[&FamilyTag::Pm(NativePm::Apt)];
        let entry = table.iter().find(|e| e.name == "apt_package_not_found").unwrap();
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex.captures("E: Unable to locate package fd-find").unwrap();
        let ctx = crate::handlers::OptionContext {
            tool: "fd",
            command: "sudo apt-get install -y fd-find",
        };
        let options = (entry.options)(&caps, &ctx);
        match &options[0].strategy {
            Strategy::RetryWithModifier { command } => {
                assert!(command.starts_with("sudo apt-get update && "));
                assert!(command.ends_with("fd-find"));
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn apt_pubkey_extracts_key_id() {
        let tables = entries();
        let table = &tables[&FamilyTag::Pm(NativePm::Apt)];
        let entry = table.iter().find(|e| e.name == "apt_missing_pubkey").unwrap();
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex
            .captures("W: GPG error: NO_PUBKEY 23F3D4EA75716059")
            .unwrap();
        let ctx = crate::handlers::OptionContext {
            tool: "gh",
            command: "sudo apt-get install -y gh",
        };
        let options = (entry.options)(&caps, &ctx);
        match &options[0].strategy {
            Strategy::AddRepository { command } => {
                assert!(command.contains("23F3D4EA75716059"));
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn snap_not_found_names_the_package() {
        let tables = entries();
        let table = &tables[&FamilyTag::Snap];
        let entry = table.iter().find(|e| e.name == "snap_not_found").unwrap();
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex.captures("error: snap \"ripgrpe\" not found").unwrap();
        let ctx = crate::handlers::OptionContext {
            tool: "ripgrep",
            command: "sudo snap install ripgrpe",
        };
        let options = (entry.options)(&caps, &ctx);
        assert!(options[0].strategy.label().contains("ripgrpe"));
    }
}
