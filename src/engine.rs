//! The resolver engine.
//!
//! The two-call surface everything else builds on: [`Engine::resolve_and_plan`]
//! decides how a tool should be installed on a profile, and
//! [`Engine::diagnose`] turns captured failure output into a
//! [`RemediationPlan`]. The CLI, any dashboard, and the coverage tests go
//! through these calls only.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{install_command, validate_references, Catalog};
use crate::chain::{build_plan, unlock_chain, ChainLimits, ChainNode, RemediationPlan};
use crate::error::{Result, SherpaError};
use crate::handlers::{match_output, HandlerRegistry};
use crate::profile::SystemProfile;
use crate::resolve::{resolve_all, select, AvailabilityStatus, Selection};

/// Output captured from an executed install command.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CapturedOutput {
    /// Text the handler matcher runs over: stderr first (failures live
    /// there), stdout after.
    pub fn match_text(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stderr, self.stdout)
        }
    }
}

/// How a tool resolves on a profile.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub tool: String,
    /// Availability of every method, keyed by method name.
    pub statuses: BTreeMap<String, AvailabilityStatus>,
    pub selection: Selection,
    /// Rendered install command for the selected method (for a locked
    /// selection, the command to run after unlocking).
    pub command: Option<String>,
    /// Expanded prerequisite chain for a locked selection.
    pub unlock_chain: Option<ChainNode>,
}

/// Outcome of diagnosing captured failure output.
#[derive(Debug, Clone)]
pub enum Diagnosis {
    /// A handler matched; here is the plan.
    Matched { plan: RemediationPlan },
    /// Nothing matched. The raw output is carried verbatim so a human
    /// can extend the catalog.
    Unmatched { output: String },
}

/// Immutable resolver over a validated catalog and handler registry.
pub struct Engine<'a> {
    catalog: &'a Catalog,
    registry: &'a HandlerRegistry,
    limits: ChainLimits,
}

impl std::fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl<'a> Engine<'a> {
    /// Build an engine, rejecting handler options that reference tools
    /// the catalog cannot install. Fails fast, before any resolution.
    pub fn new(catalog: &'a Catalog, registry: &'a HandlerRegistry) -> Result<Self> {
        validate_references(catalog, &registry.referenced_tools())?;
        Ok(Self {
            catalog,
            registry,
            limits: ChainLimits::default(),
        })
    }

    /// Override the chain depth limit.
    pub fn with_limits(mut self, limits: ChainLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve every method of `tool` on `profile` and select one.
    pub fn resolve_and_plan(&self, tool: &str, profile: &SystemProfile) -> Result<Resolution> {
        let recipe = self.catalog.require(tool)?;
        let statuses = resolve_all(recipe, profile, self.catalog);
        let selection = select(recipe, &statuses);

        let (command, chain) = match &selection {
            Selection::Ready { method } => {
                let spec = recipe.method(method).expect("selected method exists");
                (Some(install_command(recipe, method, spec, profile)?), None)
            }
            Selection::Locked { method, unlock } => {
                let spec = recipe.method(method).expect("selected method exists");
                let command = install_command(recipe, method, spec, profile)?;
                let chain = unlock_chain(tool, unlock, profile, self.catalog, self.limits)?;
                (Some(command), chain)
            }
            Selection::NoneAvailable { .. } => (None, None),
        };

        Ok(Resolution {
            tool: tool.to_string(),
            statuses,
            selection,
            command,
            unlock_chain: chain,
        })
    }

    /// Diagnose captured output from a failed install of `tool` via
    /// `method`, producing a remediation plan or the raw output.
    pub fn diagnose(
        &self,
        tool: &str,
        method: &str,
        captured: &CapturedOutput,
        profile: &SystemProfile,
    ) -> Result<Diagnosis> {
        let recipe = self.catalog.require(tool)?;
        let spec = recipe
            .method(method)
            .ok_or_else(|| SherpaError::UnknownMethod {
                tool: tool.to_string(),
                method: method.to_string(),
            })?;
        let command = install_command(recipe, method, spec, profile)?;
        let text = captured.match_text();

        match match_output(self.registry, &text, spec, tool, &command) {
            Some(matched) => {
                let plan = build_plan(&matched, tool, &command, profile, self.catalog, self.limits)?;
                Ok(Diagnosis::Matched { plan })
            }
            None => Ok(Diagnosis::Unmatched { output: text }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }
}
