//! Collaborators the exporter consumes
//!
//! Course storage, XML serialization and user accounts live outside the
//! export pipeline. The orchestrator only sees these traits.

use crate::error::Result;
use crate::types::{CommitIdentity, CourseLocator};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Writes a course's content tree
pub trait ContentExporter: Send + Sync {
    /// Write `course` into `root_dir/course_dir`, replacing what a previous
    /// export generated there.
    ///
    /// Fails with [`crate::CgxError::CourseNotFound`] for unknown courses,
    /// [`crate::CgxError::MissingAttribute`] for incomplete ones, and
    /// [`crate::CgxError::Io`] when the tree cannot be written.
    fn export_course(&self, course: &CourseLocator, root_dir: &Path, course_dir: &str) -> Result<()>;
}

/// A platform account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub email: String,
    /// Global staff may push any course
    #[serde(default)]
    pub is_staff: bool,
}

impl UserAccount {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            is_staff: false,
        }
    }

    pub fn identity(&self) -> CommitIdentity {
        CommitIdentity::new(&self.username, &self.email)
    }
}

/// Looks up platform accounts by username
pub trait UserDirectory: Send + Sync {
    fn find_user(&self, username: &str) -> Result<Option<UserAccount>>;
}

/// Directory with no accounts; every export uses the default identity
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUsers;

impl UserDirectory for NoUsers {
    fn find_user(&self, _username: &str) -> Result<Option<UserAccount>> {
        Ok(None)
    }
}

/// Decides whether a user may push a course
pub trait AccessPolicy: Send + Sync {
    fn has_access(&self, username: &str, course: &CourseLocator) -> bool;
}

/// Reads the git URL stored on a course
pub trait CourseCatalog: Send + Sync {
    /// `Ok(None)` when the course exists but has no URL configured
    fn git_url(&self, course: &CourseLocator) -> Result<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_identity() {
        let account = UserAccount::new("alice", "alice@example.com");
        assert_eq!(
            account.identity(),
            CommitIdentity::new("alice", "alice@example.com")
        );
        assert!(!account.is_staff);
    }

    #[test]
    fn test_no_users() {
        assert!(NoUsers.find_user("alice").unwrap().is_none());
    }
}
