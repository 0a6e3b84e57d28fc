//! Infrastructure failure handlers.
//!
//! The cross-tool catch-all layer: these fire for any tool and any
//! method once the more specific tables have had their chance. Together
//! they cover the canonical infrastructure failure classes (network
//! unreachable, blocked by proxy or policy, disk full, read-only
//! filesystem, sudo absent, wrong sudo password, generic permission
//! denied, out-of-memory kills, and command timeouts) so unmatched
//! output is never one of those.

use super::{lazy_regex, Category, HandlerEntry, RemediationOption, Strategy};

lazy_regex!(
    RE_NETWORK_UNREACHABLE,
    r"(?i)network is unreachable|could not resolve host|temporary failure in name resolution|failure in name resolution|no route to host"
);
lazy_regex!(
    RE_BLOCKED,
    r"(?i)403 forbidden|blocked by|access denied by policy|proxy authentication required|ssl certificate problem"
);
lazy_regex!(RE_DISK_FULL, r"(?i)no space left on device|disk quota exceeded");
lazy_regex!(RE_READ_ONLY_FS, r"(?i)read-only file system");
lazy_regex!(
    RE_SUDO_MISSING,
    r"(?i)sudo: (command )?not found|sudo: effective uid is not 0"
);
lazy_regex!(
    RE_SUDO_BAD_PASSWORD,
    r"(?i)sorry, try again|incorrect password attempt"
);
lazy_regex!(RE_PERMISSION_DENIED, r"(?i)permission denied|EACCES");
lazy_regex!(
    RE_OOM,
    r"(?i)out of memory|cannot allocate memory|oom[- ]?kill"
);
lazy_regex!(
    RE_TIMEOUT,
    r"(?i)timed out after \d+s|operation timed out|connection timed out"
);

/// The infrastructure table, ordered most specific first.
pub fn entries() -> Vec<HandlerEntry> {
    vec![
        HandlerEntry {
            name: "network_unreachable",
            pattern: RE_NETWORK_UNREACHABLE.as_str(),
            category: Category::Network,
            sample: "curl: (6) Could not resolve host: github.com",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::ManualInstruction {
                        text: "Check the network connection and any VPN, then retry".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "blocked_by_policy",
            pattern: RE_BLOCKED.as_str(),
            category: Category::Network,
            sample: "HTTP request sent... 403 Forbidden: blocked by corporate proxy",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::FixEnvironment {
                        variable: "https_proxy".to_string(),
                        value: "http://<proxy-host>:<port>".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "The download is blocked upstream; ask your network admin to allow it"
                            .to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "disk_full",
            pattern: RE_DISK_FULL.as_str(),
            category: Category::Resources,
            sample: "write /var/cache/apt/archives/partial: no space left on device",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::ManualInstruction {
                        text: "Free disk space (package caches, old logs), then retry".to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "read_only_rootfs",
            pattern: RE_READ_ONLY_FS.as_str(),
            category: Category::Environment,
            sample: "mkdir: can't create directory '/usr/local/lib': Read-only file system",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::ManualInstruction {
                        text: "The root filesystem is read-only; use a user-prefix install method \
                               or remount writable"
                            .to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "sudo_missing",
            pattern: RE_SUDO_MISSING.as_str(),
            category: Category::Permissions,
            sample: "sh: sudo: not found",
            options: |_caps, ctx| {
                let unelevated = ctx
                    .command
                    .strip_prefix("sudo ")
                    .unwrap_or(ctx.command)
                    .to_string();
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: unelevated,
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "sudo is not installed; run the command as root".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "sudo_bad_password",
            pattern: RE_SUDO_BAD_PASSWORD.as_str(),
            category: Category::Permissions,
            sample: "Sorry, try again.\nsudo: 3 incorrect password attempts",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithElevation),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "Check sudo rights with 'sudo -v' before retrying".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "permission_denied",
            pattern: RE_PERMISSION_DENIED.as_str(),
            category: Category::Permissions,
            sample: "install: cannot create regular file '/usr/local/bin/rg': Permission denied",
            options: |_caps, _ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithElevation),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "Install into a directory you own, e.g. ~/.local/bin".to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "oom_killed",
            pattern: RE_OOM.as_str(),
            category: Category::Resources,
            sample: "c++: fatal error: Killed signal terminated program cc1plus: out of memory",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::ManualInstruction {
                        text: "The build was killed for memory; close other processes or add swap"
                            .to_string(),
                    }),
                    RemediationOption::fallback(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                ]
            },
        },
        HandlerEntry {
            name: "command_timeout",
            pattern: RE_TIMEOUT.as_str(),
            category: Category::Resources,
            sample: "command timed out after 300s",
            options: |_caps, ctx| {
                vec![
                    RemediationOption::recommended(Strategy::RetryWithModifier {
                        command: ctx.command.to_string(),
                    }),
                    RemediationOption::fallback(Strategy::ManualInstruction {
                        text: "Raise the timeout with --timeout if the mirror is just slow"
                            .to_string(),
                    }),
                ]
            },
        },
    ]
}
