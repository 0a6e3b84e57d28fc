//! Terminal output, prompts, and spinners.

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// How much to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Normal,
    Verbose,
}

/// Terminal front end. Non-interactive mode answers prompts with their
/// defaults, which is what CI wants.
pub struct Ui {
    mode: OutputMode,
    interactive: bool,
}

impl Ui {
    pub fn new(interactive: bool, mode: OutputMode) -> Self {
        Self { mode, interactive }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn heading(&self, text: &str) {
        if self.mode != OutputMode::Quiet {
            println!("{}", style(text).bold());
        }
    }

    pub fn info(&self, text: &str) {
        if self.mode != OutputMode::Quiet {
            println!("{}", text);
        }
    }

    pub fn detail(&self, text: &str) {
        if self.mode == OutputMode::Verbose {
            println!("{}", style(text).dim());
        }
    }

    pub fn success(&self, text: &str) {
        if self.mode != OutputMode::Quiet {
            println!("{} {}", style("✓").green(), text);
        }
    }

    pub fn warning(&self, text: &str) {
        if self.mode != OutputMode::Quiet {
            println!("{} {}", style("!").yellow(), text);
        }
    }

    pub fn error(&self, text: &str) {
        eprintln!("{} {}", style("✗").red(), text);
    }

    /// Yes/no prompt. Falls back to `default` when not interactive.
    pub fn confirm(&self, question: &str, default: bool) -> bool {
        if !self.interactive {
            return default;
        }
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .unwrap_or(default)
    }

    /// Spinner shown while a command runs. Returns a disabled bar in
    /// quiet or non-interactive mode.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.mode == OutputMode::Quiet || !self.interactive {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("static template is valid"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

/// Whether we are running under CI.
pub fn is_ci() -> bool {
    std::env::var_os("CI").is_some() || std::env::var_os("GITHUB_ACTIONS").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_confirm_uses_default() {
        let ui = Ui::new(false, OutputMode::Normal);
        assert!(ui.confirm("proceed?", true));
        assert!(!ui.confirm("proceed?", false));
    }

    #[test]
    fn quiet_spinner_is_hidden() {
        let ui = Ui::new(false, OutputMode::Quiet);
        let bar = ui.spinner("working");
        assert!(bar.is_hidden());
    }
}
