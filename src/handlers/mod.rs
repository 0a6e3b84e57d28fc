//! Failure handler registry.
//!
//! Maps captured process output to remediation options through four
//! layered pattern tables, most specific first: per-tool, per-ecosystem
//! (tool managers, script installers, downloads), per-method-family
//! (native package managers, snap), and the cross-tool infrastructure
//! layer. Each table is a named, immutable registry constructed once and
//! passed into the matcher, never global mutable state.

// One-time regex compilation for pattern tables.
macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> =
            std::sync::LazyLock::new(|| regex::Regex::new($pattern).unwrap());
    };
}
pub(crate) use lazy_regex;

mod ecosystems;
mod families;
mod infra;
mod matcher;
mod tools;

pub use matcher::{match_output, MatchedHandler};

use regex::Captures;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::{EcoTag, FamilyTag};

/// Failure taxonomy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Environment,
    Dependency,
    Permissions,
    Network,
    Compiler,
    Compatibility,
    Configuration,
    Resources,
}

/// Which table a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    ToolSpecific,
    EcosystemFamily,
    MethodFamily,
    Infra,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::ToolSpecific => "tool",
            Layer::EcosystemFamily => "ecosystem",
            Layer::MethodFamily => "method-family",
            Layer::Infra => "infra",
        };
        write!(f, "{}", name)
    }
}

/// What a remediation option does when executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum Strategy {
    /// Install another catalog tool first.
    InstallDependency { tool: String },
    /// Re-run a modified command.
    RetryWithModifier { command: String },
    /// Re-run the original command under sudo.
    RetryWithElevation,
    /// Set an environment variable, then retry.
    FixEnvironment { variable: String, value: String },
    /// Register a package repository, then retry.
    AddRepository { command: String },
    /// Something only a human can do.
    ManualInstruction { text: String },
}

impl Strategy {
    /// Short label for menus and logs.
    pub fn label(&self) -> String {
        match self {
            Strategy::InstallDependency { tool } => format!("install {}", tool),
            Strategy::RetryWithModifier { command } => format!("run: {}", command),
            Strategy::RetryWithElevation => "retry with sudo".to_string(),
            Strategy::FixEnvironment { variable, value } => {
                format!("export {}={}", variable, value)
            }
            Strategy::AddRepository { command } => format!("run: {}", command),
            Strategy::ManualInstruction { text } => text.clone(),
        }
    }
}

/// One concrete fix the user (or the caller) can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationOption {
    pub strategy: Strategy,
    pub recommended: bool,
}

impl RemediationOption {
    pub fn recommended(strategy: Strategy) -> Self {
        Self {
            strategy,
            recommended: true,
        }
    }

    pub fn fallback(strategy: Strategy) -> Self {
        Self {
            strategy,
            recommended: false,
        }
    }
}

/// Context handed to option builders.
pub struct OptionContext<'a> {
    /// Tool whose install failed.
    pub tool: &'a str,
    /// The command that failed, for retry variants.
    pub command: &'a str,
}

/// Build concrete options from regex captures and context. Returning an
/// empty vec makes the matcher fall through to the next entry.
pub type OptionsFn = fn(&Captures, &OptionContext) -> Vec<RemediationOption>;

/// A registered failure pattern.
pub struct HandlerEntry {
    /// Handler name (for debugging and coverage enumeration).
    pub name: &'static str,
    /// Regex matched against captured output.
    pub pattern: &'static str,
    /// Failure taxonomy tag.
    pub category: Category,
    /// Representative captured output. Doubles as the declared failure
    /// scenario the coverage tests replay.
    pub sample: &'static str,
    /// Build the options for a hit.
    pub options: OptionsFn,
}

/// The four handler layers, immutable after construction.
pub struct HandlerRegistry {
    infra: Vec<HandlerEntry>,
    families: BTreeMap<FamilyTag, Vec<HandlerEntry>>,
    ecosystems: BTreeMap<EcoTag, Vec<HandlerEntry>>,
    tools: BTreeMap<&'static str, Vec<HandlerEntry>>,
}

impl HandlerRegistry {
    /// The built-in registry.
    pub fn builtin() -> Self {
        Self {
            infra: infra::entries(),
            families: families::entries(),
            ecosystems: ecosystems::entries(),
            tools: tools::entries(),
        }
    }

    pub fn infra(&self) -> &[HandlerEntry] {
        &self.infra
    }

    pub fn family(&self, tag: FamilyTag) -> &[HandlerEntry] {
        self.families.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ecosystem(&self, tag: EcoTag) -> &[HandlerEntry] {
        self.ecosystems.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tool(&self, tool: &str) -> &[HandlerEntry] {
        self.tools.get(tool).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every entry in every table, with its layer.
    pub fn all_entries(&self) -> Vec<(Layer, &HandlerEntry)> {
        let mut entries: Vec<(Layer, &HandlerEntry)> = Vec::new();
        for entry in &self.infra {
            entries.push((Layer::Infra, entry));
        }
        for table in self.families.values() {
            entries.extend(table.iter().map(|e| (Layer::MethodFamily, e)));
        }
        for table in self.ecosystems.values() {
            entries.extend(table.iter().map(|e| (Layer::EcosystemFamily, e)));
        }
        for table in self.tools.values() {
            entries.extend(table.iter().map(|e| (Layer::ToolSpecific, e)));
        }
        entries
    }

    /// Catalog tools referenced by `InstallDependency` options, gathered
    /// by replaying every entry against its own sample. Used at load time
    /// to reject dangling references.
    pub fn referenced_tools(&self) -> BTreeSet<String> {
        let mut referenced = BTreeSet::new();
        for (_, entry) in self.all_entries() {
            let Ok(regex) = regex::Regex::new(entry.pattern) else {
                continue;
            };
            let Some(caps) = regex.captures(entry.sample) else {
                continue;
            };
            let ctx = OptionContext {
                tool: "sample",
                command: "true",
            };
            for option in (entry.options)(&caps, &ctx) {
                if let Strategy::InstallDependency { tool } = option.strategy {
                    referenced.insert(tool);
                }
            }
        }
        referenced
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn all_patterns_compile() {
        for (_, entry) in HandlerRegistry::builtin().all_entries() {
            Regex::new(entry.pattern).unwrap_or_else(|e| {
                panic!("Pattern '{}' failed to compile: {}", entry.name, e);
            });
        }
    }

    #[test]
    fn no_duplicate_handler_names() {
        let registry = HandlerRegistry::builtin();
        let mut seen = std::collections::HashSet::new();
        for (_, entry) in registry.all_entries() {
            assert!(seen.insert(entry.name), "Duplicate handler name: {}", entry.name);
        }
    }

    #[test]
    fn every_sample_matches_its_own_pattern() {
        for (_, entry) in HandlerRegistry::builtin().all_entries() {
            let regex = Regex::new(entry.pattern).unwrap();
            assert!(
                regex.is_match(entry.sample),
                "Handler '{}' sample does not match its pattern",
                entry.name
            );
        }
    }

    #[test]
    fn no_handler_yields_zero_options() {
        // Schema rule: a handler with zero options is dead weight.
        let registry = HandlerRegistry::builtin();
        let ctx = OptionContext {
            tool: "ripgrep",
            command: "apt-get install -y ripgrep",
        };
        for (_, entry) in registry.all_entries() {
            let regex = Regex::new(entry.pattern).unwrap();
            let caps = regex.captures(entry.sample).unwrap();
            let options = (entry.options)(&caps, &ctx);
            assert!(
                !options.is_empty(),
                "Handler '{}' produced no options for its own sample",
                entry.name
            );
        }
    }

    #[test]
    fn referenced_tools_is_stable() {
        let registry = HandlerRegistry::builtin();
        assert_eq!(registry.referenced_tools(), registry.referenced_tools());
    }

    #[test]
    fn strategy_labels_are_humane() {
        let strategy = Strategy::InstallDependency {
            tool: "curl".to_string(),
        };
        assert_eq!(strategy.label(), "install curl");
        assert_eq!(Strategy::RetryWithElevation.label(), "retry with sudo");
    }
}
