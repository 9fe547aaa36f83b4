//! Orchestration for the setup-node step.
//!
//! This crate decides what a run does and in which order, delegating the
//! actual work to the collaborator traits of `setup-node-backend`:
//! - Version and architecture resolution from action inputs.
//! - Installer dispatch through a distribution factory.
//! - Registry auth and dependency cache coordination.
//! - Problem matcher registration.

mod arch;
mod context;
mod diagnostics;
mod dispatch;
mod env_details;
mod flags;
pub mod keys;
mod orchestrator;
mod version;
mod version_file;

/// Target architecture selection with the "architecture without version"
/// advisory.
pub use arch::resolve_arch;
/// Write-once run state and the terminal run outcome.
pub use context::{RunContext, RunOutcome};
/// Problem matcher location and emission.
pub use diagnostics::{MATCHER_FILES, emit_matchers, matchers_dir};
/// Setup request assembly and installer invocation.
pub use dispatch::{build_request, dispatch};
/// Post-install toolchain report.
pub use env_details::ToolVersions;
/// The single boolean-input conversion.
pub use flags::parse_flag;
pub use orchestrator::{Collaborators, SetupOrchestrator};
/// Version spec resolution from `node-version` / `node-version-file`.
pub use version::resolve_version;
/// Version file parser for `.nvmrc`-style files and `package.json`.
pub use version_file::NodeVersionFile;
