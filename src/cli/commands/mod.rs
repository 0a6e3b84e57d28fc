//! Command implementations.

pub mod completions;
pub mod diagnose;
pub mod display;
pub mod doctor;
pub mod install;
pub mod list;
pub mod plan;

use crate::error::{Result, SherpaError};
use crate::profile::{presets, SystemProfile};

/// Load a profile from a preset name, or detect the live system.
pub fn load_profile(preset: Option<&str>) -> Result<SystemProfile> {
    match preset {
        Some(name) => presets::by_name(name).ok_or_else(|| SherpaError::Other(anyhow::anyhow!(
            "unknown preset '{}' (expected one of: {})",
            name,
            presets::NAMES.join(", ")
        ))),
        None => Ok(SystemProfile::detect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_profile_accepts_known_preset() {
        let profile = load_profile(Some("alpine")).unwrap();
        assert!(profile.in_container);
    }

    #[test]
    fn load_profile_rejects_unknown_preset() {
        let err = load_profile(Some("beos")).unwrap_err();
        assert!(err.to_string().contains("beos"));
        assert!(err.to_string().contains("ubuntu"));
    }
}
