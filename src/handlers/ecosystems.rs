//! Ecosystem failure handlers.
//!
//! One shared table per installable-manager kind (brew, cargo, npm,
//! pipx, gem, go) plus one for piped script installers and one for
//! direct archive downloads. Reused by every tool installed that way.

use std::collections::BTreeMap;

use crate::catalog::EcoTag;
use crate::profile::ToolManager;

use super::{lazy_regex, Category, HandlerEntry, RemediationOption, Strategy};

lazy_regex!(RE_CARGO_NO_LINKER, r"(?i)linker `cc` not found");
lazy_regex!(
    RE_CARGO_BUILD_FAILED,
    r"(?i)error\[E\d+\]|could not compile `(\S+)`"
);
lazy_regex!(
    RE_CARGO_NO_PACKAGE,
    r"(?i)could not find `(\S+)` in registry"
);
lazy_regex!(
    RE_CARGO_OLD_RUST,
    r"(?i)requires rustc ([\d.]+) or newer"
);
lazy_regex!(RE_NPM_EACCES_GLOBAL, r"(?i)npm err!.*eacces");
lazy_regex!(RE_NPM_NOT_FOUND, r"(?i)npm err! 404");
lazy_regex!(
    RE_NPM_OLD_NODE,
    r"(?i)unsupported engine|requires node version"
);
lazy_regex!(
    RE_PIP_EXTERNALLY_MANAGED,
    r"(?i)externally-managed-environment"
);
lazy_regex!(RE_PIPX_NO_VENV, r"(?i)no module named (venv|ensurepip)");
lazy_regex!(RE_GEM_PERMISSIONS, r"(?i)gem::filepermissionerror");
lazy_regex!(
    RE_GEM_NATIVE_EXT,
    r"(?i)failed to build gem native extension"
);
lazy_regex!(
    RE_GO_MODULE_NOT_FOUND,
    r"(?i)no required module provides package|cannot find package"
);
lazy_regex!(
    RE_BREW_NO_FORMULA,
    r#"(?i)no available formula with the name "([^"]+)""#
);
lazy_regex!(
    RE_BREW_NEEDS_CLT,
    r"(?i)xcode command line tools|invalid active developer path"
);
lazy_regex!(RE_SCRIPT_HTTP_404, r"(?i)404 not found|the requested url returned error: 404");
lazy_regex!(
    RE_SCRIPT_INTERPRETER,
    r"(?i)sh: .*: not found|syntax error.*unexpected"
);
lazy_regex!(
    RE_DOWNLOAD_ARCHIVE_CORRUPT,
    r"(?i)tar: .*(unexpected end of file|error is not recoverable)|gzip: .*(invalid|unexpected)"
);
lazy_regex!(RE_DOWNLOAD_CHECKSUM, r"(?i)checksum mismatch|sha256.*does not match");

fn cargo() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "cargo_linker_missing",
            pattern: RE_CARGO_NO_LINKER.as_str(),
            category: Category::Compiler,
            sample: "error: linker `cc` not found",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::InstallDependency {
                        tool: "build-tools".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "Install a C toolchain (macOS: xcode-select --install)".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "cargo_old_rustc",
            pattern: RE_CARGO_OLD_RUST.as_str(),
            category: Category::Compatibility,
            sample: "error: package `ripgrep v14.1.1` requires rustc 1.79 or newer",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("rustup update stable && {}", ctx.command),
                })]
            },
        },
        HandlerEntry {
            name: "cargo_build_failed",
            pattern: RE_CARGO_BUILD_FAILED.as_str(),
            category: Category::Compiler,
            sample: "error[E0599]: no method named `foo`\nerror: could not compile `ripgrep`",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: format!("{} --locked", ctx.command),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "The crate does not build on this toolchain; try a released version"
                            .to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "cargo_unknown_crate",
            pattern: RE_CARGO_NO_PACKAGE.as_str(),
            category: Category::Configuration,
            sample: "error: could not find `ripgrpe` in registry `crates-io`",
            options: |caps, _ctx| {
                let package = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: format!("No crate named '{}'; check the package name", package),
                })]
            },
        },
    ]
}

fn npm() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "npm_global_eacces",
            pattern: RE_NPM_EACCES_GLOBAL.as_str(),
            category: Category::Permissions,
            sample: "npm ERR! Error: EACCES: permission denied, mkdir '/usr/lib/node_modules'",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::FixEnvironment {
                        variable: "NPM_CONFIG_PREFIX".to_string(),
                        value: "$HOME/.npm-global".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithElevation),
                ]
            },
        },
        HandlerEntry {
            name: "npm_package_404",
            pattern: RE_NPM_NOT_FOUND.as_str(),
            category: Category::Configuration,
            sample: "npm ERR! 404 Not Found - GET https://registry.npmjs.org/riggrep",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "The registry has no such package; check the name".to_string(),
                })]
            },
        },
        HandlerEntry {
            name: "npm_old_node",
            pattern: RE_NPM_OLD_NODE.as_str(),
            category: Category::Compatibility,
            sample: "npm WARN EBADENGINE Unsupported engine { node: '>=20' }",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "This package needs a newer Node.js; upgrade node first".to_string(),
                })]
            },
        },
    ]
}

fn pipx() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "pipx_externally_managed",
            pattern: RE_PIP_EXTERNALLY_MANAGED.as_str(),
            category: Category::Environment,
            sample: "error: externally-managed-environment",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: format!("{} --force", ctx.command),
                    }),
                    RemediationOption::fallback(Strategy::FixEnvironment {
                        variable: "PIP_BREAK_SYSTEM_PACKAGES".to_string(),
                        value: "1".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "pipx_missing_venv",
            pattern: RE_PIPX_NO_VENV.as_str(),
            category: Category::Dependency,
            sample: "ModuleNotFoundError: No module named 'venv'",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "Install the python venv module (e.g. apt: python3-venv), then retry"
                        .to_string(),
                })]
            },
        },
    ]
}

fn gem() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "gem_file_permissions",
            pattern: RE_GEM_PERMISSIONS.as_str(),
            category: Category::Permissions,
            sample: "ERROR: While executing gem ... (Gem::FilePermissionError)",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::FixEnvironment {
                        variable: "GEM_HOME".to_string(),
                        value: "$HOME/.gem".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithElevation),
                ]
            },
        },
        HandlerEntry {
            name: "gem_native_extension",
            pattern: RE_GEM_NATIVE_EXT.as_str(),
            category: Category::Compiler,
            sample: "ERROR: Failed to build gem native extension.",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::InstallDependency {
                        tool: "build-tools".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "Install a C toolchain (macOS: xcode-select --install)".to_string(),
                    }),
                ]
            },
        },
    ]
}

fn go() -> Vec<HandlerEntry> {
    vec![HandlerEntry {
        name: "go_module_not_found",
        pattern: RE_GO_MODULE_NOT_FOUND.as_str(),
        category: Category::Configuration,
        sample: "go: example.com/tool@latest: no required module provides package",
        options: |_caps, _ctx| {
            vec![RemediationOption::recommended(Strategy::ManualInstruction {
                text: "Check the module path; go install needs the full package path@version"
                    .to_string(),
            })]
        },
    }]
}

fn brew() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "brew_no_formula",
            pattern: RE_BREW_NO_FORMULA.as_str(),
            category: Category::Dependency,
            sample: "Error: No available formula with the name \"riggrep\"",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("brew update && {}", ctx.command),
                })]
            },
        },
        HandlerEntry {
            name: "brew_needs_clt",
            pattern: RE_BREW_NEEDS_CLT.as_str(),
            category: Category::Environment,
            sample: "Error: Xcode Command Line Tools are not installed",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: format!("xcode-select --install && {}", ctx.command),
                })]
            },
        },
    ]
}

fn script() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "script_url_gone",
            pattern: RE_SCRIPT_HTTP_404.as_str(),
            category: Category::Configuration,
            sample: "curl: (22) The requested URL returned error: 404",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "The installer URL is gone; check the project's install docs"
                        .to_string(),
                })]
            },
        },
        HandlerEntry {
            name: "script_externally_managed",
            pattern: RE_PIP_EXTERNALLY_MANAGED.as_str(),
            category: Category::Environment,
            sample: "error: externally-managed-environment",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::InstallDependency {
                        tool: "pipx".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::FixEnvironment {
                        variable: "PIP_BREAK_SYSTEM_PACKAGES".to_string(),
                        value: "1".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "script_interpreter_error",
            pattern: RE_SCRIPT_INTERPRETER.as_str(),
            category: Category::Compatibility,
            sample: "sh: line 42: wget: not found",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "The install script assumes tools this shell lacks; read the script \
                           and install its prerequisites"
                        .to_string(),
                })]
            },
        },
    ]
}

fn download() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "download_archive_corrupt",
            pattern: RE_DOWNLOAD_ARCHIVE_CORRUPT.as_str(),
            category: Category::Network,
            sample: "tar: Unexpected EOF in archive\ntar: Error is not recoverable: exiting now",
            options: |_caps, ctx| {
                vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                    command: ctx.command.to_string(),
                })]
            },
        },
        HandlerEntry {
            name: "download_checksum_mismatch",
            pattern: RE_DOWNLOAD_CHECKSUM.as_str(),
            category: Category::Network,
            sample: "sha256 checksum mismatch for tool-x86_64.tar.gz",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "Repeated mismatches suggest a tampering proxy; verify the mirror"
                            .to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "download_url_gone",
            pattern: RE_SCRIPT_HTTP_404.as_str(),
            category: Category::Configuration,
            sample: "curl: (22) The requested URL returned error: 404",
            options: |_caps, _ctx| {
                vec![RemediationOption::recommended(Strategy::ManualInstruction {
                    text: "The release asset moved; the recipe may pin an old version"
                        .to_string(),
                })]
            },
        },
    ]
}

/// All ecosystem tables, keyed by ecosystem tag.
pub fn entries() -> BTreeMap<EcoTag, Vec<HandlerEntry>> {
    BTreeMap::from([
        (EcoTag::Manager(ToolManager::Cargo), cargo()),
        (EcoTag::Manager(ToolManager::Npm), npm()),
        (EcoTag::Manager(ToolManager::Pipx), pipx()),
        (EcoTag::Manager(ToolManager::Gem), gem()),
        (EcoTag::Manager(ToolManager::Go), go()),
        (EcoTag::Manager(ToolManager::Brew), brew()),
        (EcoTag::Script, script()),
        (EcoTag::Download, download()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::OptionContext;

    #[test]
    fn every_manager_kind_has_a_table() {
        let tables = entries();
        for manager in [
            ToolManager::Brew,
            ToolManager::Cargo,
            ToolManager::Npm,
            ToolManager::Pipx,
            ToolManager::Gem,
            ToolManager::Go,
        ] {
            assert!(
                tables.contains_key(&EcoTag::Manager(manager)),
                "no table for {}",
                manager
            );
        }
        assert!(tables.contains_key(&EcoTag::Script));
        assert!(tables.contains_key(&EcoTag::Download));
    }

    #[test]
    fn cargo_linker_failure_installs_build_tools() {
        let tables = entries();
        let table = &tables[&EcoTag::Manager(ToolManager::Cargo)];
        let entry = table.iter().find(|e| e.name == "cargo_linker_missing").unwrap();
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex.captures("error: linker `cc` not found").unwrap();
        let ctx = OptionContext {
            tool: "ripgrep",
            command: "cargo install ripgrep",
        };
        let options = (entry.options)(&caps, &ctx);
        assert_eq!(
            options[0].strategy,
            Strategy::InstallDependency {
                tool: "build-tools".to_string()
            }
        );
    }

    #[test]
    fn script_externally_managed_reaches_for_pipx() {
        let tables = entries();
        let table = &tables[&EcoTag::Script];
        let entry = table
            .iter()
            .find(|e| e.name == "script_externally_managed")
            .unwrap();
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex.captures("error: externally-managed-environment").unwrap();
        let ctx = OptionContext {
            tool: "some-py-tool",
            command: "curl -fsSL https://example.com/install.sh | sh",
        };
        let options = (entry.options)(&caps, &ctx);
        assert!(matches!(
            &options[0].strategy,
            Strategy::InstallDependency { tool } if tool == "pipx"
        ));
    }

    #[test]
    fn npm_eacces_prefers_user_prefix_over_sudo() {
        let tables = entries();
        let table = &tables[&EcoTag::Manager(ToolManager::Npm)];
        let entry = table.iter().find(|e| e.name == "npm_global_eacces").unwrap();
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex.captures(entry.sample).unwrap();
        let ctx = OptionContext {
            tool: "x",
            command: "npm install -g x",
        };
        let options = (entry.options)(&caps, &ctx);
        assert!(options[0].recommended);
        assert!(matches!(options[0].strategy, Strategy::FixEnvironment { .. }));
        assert!(!options[1].recommended);
        assert!(matches!(options[1].strategy, Strategy::RetryWithElevation));
    }
}
