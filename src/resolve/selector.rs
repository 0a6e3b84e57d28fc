//! Method selection.
//!
//! Walks the recipe's preference order over resolved availability
//! statuses. The order is authoritative and total: the first `Ready`
//! method wins, a `Locked` method is only offered when nothing is
//! `Ready`, and `NoneAvailable` means every method is `Impossible`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::Recipe;

use super::availability::{AvailabilityStatus, ImpossibleReason, UnlockAction};

/// Outcome of method selection for one tool on one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "selection")]
pub enum Selection {
    /// Use this method now.
    Ready { method: String },
    /// Best remaining option: this method, once its prerequisite is
    /// installed.
    Locked { method: String, unlock: UnlockAction },
    /// Every method is structurally impossible here.
    NoneAvailable {
        reasons: Vec<(String, ImpossibleReason)>,
    },
}

impl Selection {
    /// Name of the selected method, when there is one.
    pub fn method(&self) -> Option<&str> {
        match self {
            Selection::Ready { method } | Selection::Locked { method, .. } => Some(method),
            Selection::NoneAvailable { .. } => None,
        }
    }
}

/// Select a method per the recipe's preference order.
pub fn select(recipe: &Recipe, statuses: &BTreeMap<String, AvailabilityStatus>) -> Selection {
    for name in &recipe.prefer {
        if let Some(AvailabilityStatus::Ready) = statuses.get(name) {
            return Selection::Ready {
                method: name.clone(),
            };
        }
    }

    for name in &recipe.prefer {
        if let Some(AvailabilityStatus::Locked { unlock }) = statuses.get(name) {
            return Selection::Locked {
                method: name.clone(),
                unlock: unlock.clone(),
            };
        }
    }

    let reasons = recipe
        .prefer
        .iter()
        .filter_map(|name| match statuses.get(name) {
            Some(AvailabilityStatus::Impossible { reason }) => {
                Some((name.clone(), reason.clone()))
            }
            _ => None,
        })
        .collect();
    Selection::NoneAvailable { reasons }
}
