//! Tool-specific failure handlers.
//!
//! The most specific layer: quirks of individual tools that no shared
//! table should know about. Most tools need no entry here; the family
//! and infra layers carry them.

use std::collections::BTreeMap;

use super::{lazy_regex, Category, HandlerEntry, RemediationOption, Strategy};

lazy_regex!(RE_FZF_DIR_EXISTS, r"(?i)~?/\.fzf.* already exists");
lazy_regex!(
    RE_GH_REPO_NOT_CONFIGURED,
    r"(?i)the repository .*cli/cli.* was not found|unable to find.*gh.*keyring"
);
lazy_regex!(
    RE_BREW_INSTALL_NONINTERACTIVE,
    r"(?i)need sudo access on macos|don't run this as root"
);

fn fzf() -> Vec<HandlerEntry> {
    vec![HandlerEntry {
        name: "fzf_clone_target_exists",
        pattern: RE_FZF_DIR_EXISTS.as_str(),
        category: Category::Environment,
        sample: "fatal: destination path '/home/user/.fzf' already exists",
        options: |_caps, ctx| {
            vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                command: format!("rm -rf ~/.fzf && {}", ctx.command),
            })]
        },
    }]
}

fn gh() -> Vec<HandlerEntry> {
    vec![HandlerEntry {
        name: "gh_keyring_missing",
        pattern: RE_GH_REPO_NOT_CONFIGURED.as_str(),
        category: Category::Configuration,
        sample: "E: Unable to find the GitHub CLI gh package: missing keyring",
        options: |_caps, _ctx| {
            vec![RemediationOption::recommended(Strategy::AddRepository {
                command: "curl -fsSL https://cli.github.com/packages/githubcli-archive-keyring.gpg \
                          | sudo dd of=/usr/share/keyrings/githubcli-archive-keyring.gpg"
                    .to_string(),
            })]
        },
    }]
}

fn brew_tool() -> Vec<HandlerEntry> {
    vec![HandlerEntry {
        name: "brew_installer_refuses_root",
        pattern: RE_BREW_INSTALL_NONINTERACTIVE.as_str(),
        category: Category::Permissions,
        sample: "Don't run this as root!",
        options: |_caps, ctx| {
            vec![RemediationOption::recommended(Strategy::RetryWithModifier {
                command: ctx
                    .command
                    .strip_prefix("sudo ")
                    .unwrap_or(ctx.command)
                    .to_string(),
            })]
        },
    }]
}

/// Tool-specific tables, keyed by tool id.
pub fn entries() -> BTreeMap<&'static str, Vec<HandlerEntry>> {
    BTreeMap::from([("fzf", fzf()), ("gh", gh()), ("brew", brew_tool())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fzf_fix_removes_stale_clone() {
        let tables = entries();
        let entry = &tables["fzf"][0];
        let regex = regex::Regex::new(entry.pattern).unwrap();
        let caps = regex.captures(entry.sample).unwrap();
        let ctx = crate::handlers::OptionContext {
            tool: "fzf",
            command: "git clone --depth 1 https://github.com/junegunn/fzf.git ~/.fzf",
        };
        let options = (entry.options)(&caps, &ctx);
        assert!(options[0].strategy.label().contains("rm -rf ~/.fzf"));
    }

    #[test]
    fn unlisted_tool_has_no_table() {
        assert!(!entries().contains_key("ripgrep"));
    }
}
