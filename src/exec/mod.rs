//! Shell command execution.

mod shell;

pub use shell::ShellExecutor;

use crate::engine::CapturedOutput;
use crate::error::Result;

/// A command to execute.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Shell command line.
    pub command: String,
    /// Timeout in seconds (None = no timeout).
    pub timeout: Option<u64>,
}

/// Runs install commands and captures their output.
///
/// The engine never retries through this interface: retries are
/// remediation options the caller re-executes.
pub trait CommandExecutor {
    fn execute(&self, request: &ExecRequest) -> Result<CapturedOutput>;
}
