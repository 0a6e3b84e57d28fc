//! Remediation plan types.
//!
//! A [`RemediationPlan`] is the expanded form of a matched handler: every
//! option annotated with whether it can run right now, plus the fully
//! expanded dependency chain and the literal commands in execution order,
//! prerequisites first.

use serde::Serialize;

use crate::handlers::{Category, Layer, RemediationOption};
use crate::resolve::Selection;

/// Whether an option can be acted on for this profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Actionable immediately.
    Executable,
    /// Actionable after its dependency chain installs, which the plan
    /// schedules first.
    RequiresUnlock,
    /// Cannot work on this profile (e.g. elevation without sudo, or a
    /// dependency that is impossible here).
    Unavailable,
}

/// One node of an expanded dependency chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChainNode {
    /// Dependency tool this node installs.
    pub tool: String,
    /// How the dependency itself resolves on this profile.
    pub selection: Selection,
    /// Rendered install command for the selected method, when one exists.
    pub command: Option<String>,
    /// Deeper prerequisites that must install before this node.
    pub children: Vec<ChainNode>,
}

impl ChainNode {
    /// Collect commands depth-first (prerequisites before dependents).
    /// Returns false when any node on the chain has no runnable command.
    pub fn collect_commands(&self, out: &mut Vec<String>) -> bool {
        for child in &self.children {
            if !child.collect_commands(out) {
                return false;
            }
        }
        match &self.command {
            Some(command) => {
                out.push(command.clone());
                true
            }
            None => false,
        }
    }

    /// Whether every step of the chain has a runnable command.
    pub fn is_resolvable(&self) -> bool {
        let mut sink = Vec::new();
        self.collect_commands(&mut sink)
    }
}

/// A remediation option, expanded and annotated.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedOption {
    #[serde(flatten)]
    pub option: RemediationOption,
    pub readiness: Readiness,
    /// Dependency chain for `install_dependency` options.
    pub chain: Option<ChainNode>,
    /// Literal commands in execution order, prerequisites first. Empty
    /// for purely manual options.
    pub commands: Vec<String>,
}

/// The full expansion of a matched handler for one failure.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationPlan {
    /// Tool whose install failed.
    pub tool: String,
    /// Matched handler name.
    pub handler: String,
    pub category: Category,
    pub layer: Layer,
    /// Options in the handler's declared order.
    pub options: Vec<PlannedOption>,
}

impl RemediationPlan {
    /// The recommended option that is actionable here, if any.
    pub fn best(&self) -> Option<&PlannedOption> {
        self.options
            .iter()
            .find(|o| o.option.recommended && o.readiness != Readiness::Unavailable)
            .or_else(|| {
                self.options
                    .iter()
                    .find(|o| o.readiness != Readiness::Unavailable)
            })
    }
}
