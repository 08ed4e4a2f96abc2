//! cgx-core - Core library for cgx
//!
//! This crate exports authored courses into git remotes: remote URL
//! validation, working-copy synchronization, commit and push, and the
//! orchestrator that ties them together and reports one status per export.

pub mod error;
pub mod types;
pub mod config;
pub mod log;
pub mod remote;
pub mod git;
pub mod sync;
pub mod publish;
pub mod content;
pub mod outcome;
pub mod orchestrator;
pub mod push;

pub use error::{CgxError, Result};
pub use orchestrator::GitExporter;
pub use outcome::{ExportFailure, ExportOutcome, ExportStatus};
pub use types::*;
