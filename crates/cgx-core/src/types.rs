//! Core type definitions for cgx

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Scheme marker carried by locators from the old location format
pub const LEGACY_LOCATOR_PREFIX: &str = "i4x://";

/// Identifies one course as `org/course/run`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseLocator {
    pub org: String,
    pub course: String,
    pub run: String,
}

impl CourseLocator {
    /// Create a locator from its parts
    pub fn new(org: impl Into<String>, course: impl Into<String>, run: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            course: course.into(),
            run: run.into(),
        }
    }

    /// Remove the legacy scheme marker if present
    pub fn strip_legacy_prefix(raw: &str) -> &str {
        raw.strip_prefix(LEGACY_LOCATOR_PREFIX).unwrap_or(raw)
    }

    /// Parse `org/course/run`, accepting the legacy prefix
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let stripped = Self::strip_legacy_prefix(raw);
        let parts: Vec<&str> = stripped.split('/').collect();
        if parts.len() != 3 {
            return Err(crate::CgxError::InvalidLocator(format!(
                "'{}' must have the form org/course/run",
                raw
            )));
        }

        for part in &parts {
            if !Self::valid_segment(part) {
                return Err(crate::CgxError::InvalidLocator(format!(
                    "'{}' has an invalid segment '{}'",
                    raw, part
                )));
            }
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    fn valid_segment(segment: &str) -> bool {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && segment != "."
            && segment != ".."
    }
}

impl fmt::Display for CourseLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.org, self.course, self.run)
    }
}

/// One request to export a course into a git remote
///
/// The course locator is kept raw here; it is resolved by the exporter
/// only after the working copy has been synchronized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    course: String,
    remote_url: String,
    repo_dir: Option<String>,
    user: Option<String>,
}

impl ExportRequest {
    /// Create a request for a course and remote
    pub fn new(course: impl Into<String>, remote_url: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            remote_url: remote_url.into(),
            repo_dir: None,
            user: None,
        }
    }

    /// Override the local working directory name
    pub fn with_repo_dir(mut self, repo_dir: impl Into<String>) -> Self {
        self.repo_dir = Some(repo_dir.into());
        self
    }

    /// Credit the export to a platform user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn repo_dir(&self) -> Option<&str> {
        self.repo_dir.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Name shown in the commit message; empty when no user was given
    pub fn user_label(&self) -> &str {
        self.user.as_deref().unwrap_or("")
    }
}

/// Name/email pair recorded on export commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for CommitIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A synchronized local working copy of the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// `export_root/<derived name>`
    pub path: PathBuf,
    /// Remote the working copy now points at
    pub remote_url: String,
    /// Branch checked out after synchronization
    pub branch: String,
}
