//! The `doctor` command: show the detected system profile.

use crate::cli::args::DoctorArgs;
use crate::error::Result;
use crate::profile::SystemProfile;
use crate::ui::Ui;

pub fn run(args: &DoctorArgs, ui: &Ui) -> Result<u8> {
    let profile = SystemProfile::detect();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&profile).map_err(anyhow::Error::from)?
        );
        return Ok(0);
    }

    ui.heading("System profile");
    ui.info(&format!("  os:           {}", profile.os));
    if profile.is_wsl {
        ui.info("  wsl:          yes");
    }
    if profile.in_container {
        ui.info("  container:    yes");
    }
    ui.info(&format!(
        "  arch:         {} ({})",
        profile.arch.raw, profile.arch.normalized
    ));
    let managers: Vec<String> = profile
        .package_managers
        .iter()
        .map(|pm| pm.to_string())
        .collect();
    ui.info(&format!(
        "  package mgrs: {}",
        if managers.is_empty() {
            "none".to_string()
        } else {
            managers.join(", ")
        }
    ));
    ui.info(&format!("  root:         {}", profile.is_root));
    ui.info(&format!("  sudo:         {}", profile.has_sudo));
    ui.info(&format!("  fs writable:  {}", profile.fs_writable));
    ui.info(&format!("  systemd:      {}", profile.has_systemd));
    if profile.language_env.python_externally_managed {
        ui.info("  python:       externally managed (PEP 668)");
    }
    ui.info(&format!(
        "  binaries:     {}",
        profile
            .installed_binaries
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    ));
    Ok(0)
}
