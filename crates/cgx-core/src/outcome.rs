//! Export status codes and outcomes

use crate::git::{GitStep, GitStepError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result code of an export.
///
/// The numeric values are part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ExportStatus {
    Success = 0,
    ExportRootMissing = 1,
    MalformedRemoteUrl = 2,
    MissingCredentialsInUrl = 3,
    SyncFailed = 4,
    XmlExportFailed = 5,
    CommitOrPushFailed = 6,
    InvalidCourseLocator = 7,
}

impl ExportStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self == ExportStatus::Success
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExportStatus::Success => "success",
            ExportStatus::ExportRootMissing => "export root missing",
            ExportStatus::MalformedRemoteUrl => "malformed remote url",
            ExportStatus::MissingCredentialsInUrl => "missing credentials in url",
            ExportStatus::SyncFailed => "unable to update git repository",
            ExportStatus::XmlExportFailed => "unable to export course to xml",
            ExportStatus::CommitOrPushFailed => "unable to commit or push changes",
            ExportStatus::InvalidCourseLocator => "bad course location",
        };
        write!(f, "{}", text)
    }
}

/// Why an export stopped, with the context of the failing stage
#[derive(Debug, Error)]
pub enum ExportFailure {
    #[error("export root {} does not exist", .path.display())]
    ExportRootMissing { path: PathBuf },

    #[error("remote url {url} is not a writable git url")]
    MalformedRemoteUrl { url: String },

    #[error("remote url {url} has no embedded username and password")]
    MissingCredentialsInUrl { url: String },

    #[error("unable to update git repository: {source}")]
    SyncFailed {
        #[source]
        source: GitStepError,
    },

    #[error("course locator '{locator}' is invalid: {reason}")]
    InvalidCourseLocator { locator: String, reason: String },

    #[error("unable to export course to xml: {reason}")]
    XmlExportFailed { reason: String },

    #[error("unable to commit or push changes: {source}")]
    CommitOrPushFailed {
        #[source]
        source: GitStepError,
    },
}

impl ExportFailure {
    pub fn status(&self) -> ExportStatus {
        match self {
            ExportFailure::ExportRootMissing { .. } => ExportStatus::ExportRootMissing,
            ExportFailure::MalformedRemoteUrl { .. } => ExportStatus::MalformedRemoteUrl,
            ExportFailure::MissingCredentialsInUrl { .. } => ExportStatus::MissingCredentialsInUrl,
            ExportFailure::SyncFailed { .. } => ExportStatus::SyncFailed,
            ExportFailure::InvalidCourseLocator { .. } => ExportStatus::InvalidCourseLocator,
            ExportFailure::XmlExportFailed { .. } => ExportStatus::XmlExportFailed,
            ExportFailure::CommitOrPushFailed { .. } => ExportStatus::CommitOrPushFailed,
        }
    }

    /// The git step that failed, for the git-backed stages
    pub fn git_step(&self) -> Option<GitStep> {
        match self {
            ExportFailure::SyncFailed { source } | ExportFailure::CommitOrPushFailed { source } => {
                Some(source.step())
            }
            _ => None,
        }
    }

    /// Exit code of the failing git process, when there was one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExportFailure::SyncFailed { source } | ExportFailure::CommitOrPushFailed { source } => {
                source.exit_code()
            }
            _ => None,
        }
    }
}

/// What an export produced: exactly one status and the full log
#[derive(Debug)]
pub struct ExportOutcome {
    failure: Option<ExportFailure>,
    log: String,
}

impl ExportOutcome {
    pub fn success(log: String) -> Self {
        Self { failure: None, log }
    }

    pub fn failed(failure: ExportFailure, log: String) -> Self {
        Self {
            failure: Some(failure),
            log,
        }
    }

    pub fn status(&self) -> ExportStatus {
        self.failure
            .as_ref()
            .map(ExportFailure::status)
            .unwrap_or(ExportStatus::Success)
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure(&self) -> Option<&ExportFailure> {
        self.failure.as_ref()
    }

    /// Output of every operation the export ran, in order
    pub fn log(&self) -> &str {
        &self.log
    }
}
