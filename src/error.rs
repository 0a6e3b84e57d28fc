//! Error types for Sherpa operations.
//!
//! This module defines [`SherpaError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Availability, selection, and diagnosis outcomes are ordinary values
//!   (`AvailabilityStatus`, `Selection`, `Diagnosis`) and are never errors
//! - `SherpaError` covers configuration problems (malformed catalog data),
//!   chain expansion failures, and IO
//! - Use `anyhow::Error` (via `SherpaError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use thiserror::Error;

/// Core error type for Sherpa operations.
#[derive(Debug, Error)]
pub enum SherpaError {
    /// Failed to parse a recipe or catalog document.
    #[error("Failed to parse recipe '{name}': {message}")]
    CatalogParse { name: String, message: String },

    /// Catalog data is structurally invalid (dangling references,
    /// incomplete preference order, bad templates).
    #[error("Invalid catalog: {message}")]
    CatalogValidation { message: String },

    /// Requested tool has no recipe in the catalog.
    #[error("Unknown tool: {tool}")]
    UnknownTool { tool: String },

    /// Requested method does not exist on the tool's recipe.
    #[error("Tool '{tool}' has no method '{method}'")]
    UnknownMethod { tool: String, method: String },

    /// Command template references a placeholder with no value.
    #[error("Method '{method}' template uses unknown placeholder '{placeholder}'")]
    Template { method: String, placeholder: String },

    /// Dependency chain revisited a tool already on the current path.
    #[error("Circular install dependency: {path}")]
    ChainCycle { path: String },

    /// Dependency chain exceeded the expansion depth limit.
    #[error("Install dependency chain exceeds depth limit {limit}")]
    ChainTooDeep { limit: usize },

    /// Shell command could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Sherpa operations.
pub type Result<T> = std::result::Result<T, SherpaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parse_displays_name_and_message() {
        let err = SherpaError::CatalogParse {
            name: "ripgrep".into(),
            message: "missing field `methods`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ripgrep"));
        assert!(msg.contains("missing field `methods`"));
    }

    #[test]
    fn catalog_validation_displays_message() {
        let err = SherpaError::CatalogValidation {
            message: "prefer lists unknown method 'apt'".into(),
        };
        assert!(err.to_string().contains("unknown method 'apt'"));
    }

    #[test]
    fn unknown_tool_displays_tool() {
        let err = SherpaError::UnknownTool {
            tool: "nonexistent".into(),
        };
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn unknown_method_displays_both() {
        let err = SherpaError::UnknownMethod {
            tool: "jq".into(),
            method: "snap".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("jq"));
        assert!(msg.contains("snap"));
    }

    #[test]
    fn template_displays_placeholder() {
        let err = SherpaError::Template {
            method: "apt".into(),
            placeholder: "pakage".into(),
        };
        assert!(err.to_string().contains("pakage"));
    }

    #[test]
    fn chain_cycle_displays_path() {
        let err = SherpaError::ChainCycle {
            path: "fzf -> curl -> fzf".into(),
        };
        assert!(err.to_string().contains("fzf -> curl -> fzf"));
    }

    #[test]
    fn chain_too_deep_displays_limit() {
        let err = SherpaError::ChainTooDeep { limit: 5 };
        assert!(err.to_string().contains('5'));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SherpaError::CommandFailed {
            command: "apt-get install -y jq".into(),
            code: Some(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get install -y jq"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SherpaError = io_err.into();
        assert!(matches!(err, SherpaError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SherpaError::UnknownTool { tool: "x".into() })
        }
        assert!(returns_error().is_err());
    }
}
