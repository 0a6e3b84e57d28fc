//! Dependency chain expansion.
//!
//! Turns a matched handler into an executable [`RemediationPlan`].
//! `install_dependency` options recurse through the availability
//! resolver and method selector for the dependency tool, carrying an
//! immutable breadcrumb path for cycle detection and a depth bound, so
//! expansion always terminates. Cycles and depth overruns are surfaced
//! as errors, never silently dropped.

use crate::catalog::{install_command, Catalog};
use crate::error::{Result, SherpaError};
use crate::handlers::{MatchedHandler, Strategy};
use crate::profile::SystemProfile;
use crate::resolve::{resolve_all, select, Selection, UnlockAction};

use super::plan::{ChainNode, PlannedOption, Readiness, RemediationPlan};

/// Default bound on chain expansion depth.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Expansion limits.
#[derive(Debug, Clone, Copy)]
pub struct ChainLimits {
    pub max_depth: usize,
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Expand a matched handler into a plan for `tool` on `profile`.
///
/// `command` is the command that failed, used to build retry variants.
pub fn build_plan(
    matched: &MatchedHandler,
    tool: &str,
    command: &str,
    profile: &SystemProfile,
    catalog: &Catalog,
    limits: ChainLimits,
) -> Result<RemediationPlan> {
    let mut options = Vec::with_capacity(matched.options.len());
    for option in &matched.options {
        let planned = match &option.strategy {
            Strategy::InstallDependency { tool: dep } => {
                let path = vec![tool.to_string()];
                let chain = expand(dep, profile, catalog, &path, 1, limits)?;
                let mut commands = Vec::new();
                let resolvable = chain.collect_commands(&mut commands);
                let readiness = if !resolvable {
                    commands.clear();
                    Readiness::Unavailable
                } else if matches!(chain.selection, Selection::Ready { .. }) {
                    commands.push(command.to_string());
                    Readiness::Executable
                } else {
                    commands.push(command.to_string());
                    Readiness::RequiresUnlock
                };
                PlannedOption {
                    option: option.clone(),
                    readiness,
                    chain: Some(chain),
                    commands,
                }
            }
            Strategy::RetryWithModifier { command: modified } => PlannedOption {
                option: option.clone(),
                readiness: Readiness::Executable,
                chain: None,
                commands: vec![modified.clone()],
            },
            Strategy::RetryWithElevation => {
                // Readiness of elevation depends only on the profile.
                if profile.can_elevate() {
                    let elevated = if command.starts_with("sudo ") {
                        command.to_string()
                    } else {
                        format!("sudo {}", command)
                    };
                    PlannedOption {
                        option: option.clone(),
                        readiness: Readiness::Executable,
                        chain: None,
                        commands: vec![elevated],
                    }
                } else {
                    PlannedOption {
                        option: option.clone(),
                        readiness: Readiness::Unavailable,
                        chain: None,
                        commands: vec![],
                    }
                }
            }
            Strategy::FixEnvironment { variable, value } => PlannedOption {
                option: option.clone(),
                readiness: Readiness::Executable,
                chain: None,
                commands: vec![
                    format!("export {}={}", variable, value),
                    command.to_string(),
                ],
            },
            Strategy::AddRepository { command: repo_cmd } => PlannedOption {
                option: option.clone(),
                readiness: Readiness::Executable,
                chain: None,
                commands: vec![repo_cmd.clone(), command.to_string()],
            },
            Strategy::ManualInstruction { .. } => PlannedOption {
                option: option.clone(),
                readiness: Readiness::Executable,
                chain: None,
                commands: vec![],
            },
        };
        options.push(planned);
    }

    Ok(RemediationPlan {
        tool: tool.to_string(),
        handler: matched.name.to_string(),
        category: matched.category,
        layer: matched.layer,
        options,
    })
}

/// Expand the unlock chain for a `Locked` selection of `tool`.
///
/// Returns the chain for the unlock target when the catalog can install
/// it, `None` when only the hint applies.
pub fn unlock_chain(
    tool: &str,
    unlock: &UnlockAction,
    profile: &SystemProfile,
    catalog: &Catalog,
    limits: ChainLimits,
) -> Result<Option<ChainNode>> {
    let Some(dep) = &unlock.tool else {
        return Ok(None);
    };
    let path = vec![tool.to_string()];
    expand(dep, profile, catalog, &path, 1, limits).map(Some)
}

/// Recursively resolve one dependency tool.
///
/// `path` is the breadcrumb trail of tools already visited on this
/// branch; revisiting one is a cycle and fails closed.
fn expand(
    dep: &str,
    profile: &SystemProfile,
    catalog: &Catalog,
    path: &[String],
    depth: usize,
    limits: ChainLimits,
) -> Result<ChainNode> {
    if path.iter().any(|visited| visited == dep) {
        let mut cycle: Vec<&str> = path.iter().map(String::as_str).collect();
        cycle.push(dep);
        return Err(SherpaError::ChainCycle {
            path: cycle.join(" -> "),
        });
    }
    if depth >= limits.max_depth {
        return Err(SherpaError::ChainTooDeep {
            limit: limits.max_depth,
        });
    }

    let recipe = catalog.require(dep)?;
    let statuses = resolve_all(recipe, profile, catalog);
    let selection = select(recipe, &statuses);

    let mut next_path = path.to_vec();
    next_path.push(dep.to_string());

    let (command, children) = match &selection {
        Selection::Ready { method } => {
            let spec = recipe.method(method).expect("selected method exists");
            let command = install_command(recipe, method, spec, profile)?;
            (Some(command), Vec::new())
        }
        Selection::Locked { method, unlock } => {
            let spec = recipe.method(method).expect("selected method exists");
            let command = install_command(recipe, method, spec, profile)?;
            let children = match &unlock.tool {
                Some(inner) => {
                    vec![expand(inner, profile, catalog, &next_path, depth + 1, limits)?]
                }
                None => Vec::new(),
            };
            // A locked method with no installable unlock has no runnable
            // chain; drop the command so the plan reports it unresolvable.
            if children.is_empty() {
                (None, Vec::new())
            } else {
                (Some(command), children)
            }
        }
        Selection::NoneAvailable { .. } => (None, Vec::new()),
    };

    Ok(ChainNode {
        tool: dep.to_string(),
        selection,
        command,
        children,
    })
}
