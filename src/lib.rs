//! Sherpa - install CLI tools anywhere, and fix the installs that fail.
//!
//! Sherpa picks the best way to install a tool on whatever machine it is
//! running on (distro package managers, Homebrew, language ecosystems,
//! script installers, release downloads), runs it, and when the install
//! fails, diagnoses the captured output and proposes concrete,
//! re-runnable fixes, including multi-step prerequisite chains.
//!
//! # Modules
//!
//! - [`catalog`] - Recipe data model, embedded catalog, validation
//! - [`chain`] - Remediation plans and dependency chain expansion
//! - [`cli`] - Command-line interface and argument parsing
//! - [`engine`] - The two-call resolver surface
//! - [`error`] - Error types and result aliases
//! - [`exec`] - Shell command execution with timeouts
//! - [`handlers`] - Layered failure pattern registry and matcher
//! - [`profile`] - System profile model, detection, and presets
//! - [`resolve`] - Availability resolution and method selection
//! - [`ui`] - Terminal output, prompts, and spinners
//!
//! # Example
//!
//! ```
//! use sherpa::catalog::Catalog;
//! use sherpa::engine::Engine;
//! use sherpa::handlers::HandlerRegistry;
//! use sherpa::profile::presets;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let registry = HandlerRegistry::builtin();
//! let engine = Engine::new(&catalog, &registry).unwrap();
//!
//! let profile = presets::by_name("ubuntu").unwrap();
//! let resolution = engine.resolve_and_plan("ripgrep", &profile).unwrap();
//! assert_eq!(resolution.selection.method(), Some("apt"));
//! ```

pub mod catalog;
pub mod chain;
pub mod cli;
pub mod engine;
pub mod error;
pub mod exec;
pub mod handlers;
pub mod profile;
pub mod resolve;
pub mod ui;

pub use error::{Result, SherpaError};
