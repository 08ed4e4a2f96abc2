//! Commit and push of exported content

use crate::git::{run_step, GitBackend, GitCommand, GitStepError};
use crate::log::ExportLog;
use crate::types::{CommitIdentity, RepositoryHandle};
use chrono::{DateTime, Utc};

/// Commit message for an export credited to `user`
pub fn commit_message(user: &str, at: DateTime<Utc>) -> String {
    format!("({}) Export from Studio at {}", user, at)
}

/// Commits the working tree and pushes it to the tracked remote
pub struct CommitPublisher<'a> {
    git: &'a dyn GitBackend,
}

impl<'a> CommitPublisher<'a> {
    pub fn new(git: &'a dyn GitBackend) -> Self {
        Self { git }
    }

    /// Set the identity, stage everything, commit and push.
    ///
    /// An unchanged tree makes `git commit` exit non-zero, which is reported
    /// like any other failed step.
    pub fn publish(
        &self,
        repo: &RepositoryHandle,
        identity: &CommitIdentity,
        message: &str,
        log: &mut ExportLog,
    ) -> Result<(), GitStepError> {
        let commands = [
            GitCommand::Config {
                key: "user.email".to_string(),
                value: identity.email.clone(),
            },
            GitCommand::Config {
                key: "user.name".to_string(),
                value: identity.name.clone(),
            },
            GitCommand::AddAll,
            GitCommand::Commit {
                message: message.to_string(),
            },
            GitCommand::Push,
        ];

        for command in &commands {
            run_step(self.git, &repo.path, command, log)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::scripted::ScriptedGit;
    use crate::git::GitStep;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn handle() -> RepositoryHandle {
        RepositoryHandle {
            path: PathBuf::from("/srv/repos/course"),
            remote_url: "file:///tmp/course.git".to_string(),
            branch: "master".to_string(),
        }
    }

    #[test]
    fn test_commit_message() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(
            commit_message("alice", at),
            "(alice) Export from Studio at 2024-03-01 12:30:00 UTC"
        );
        assert!(commit_message("", at).starts_with("() Export from Studio"));
    }

    #[test]
    fn test_publish_sequence() {
        let git = ScriptedGit::new();
        let mut log = ExportLog::new();
        let identity = CommitIdentity::new("alice", "alice@example.com");

        CommitPublisher::new(&git)
            .publish(&handle(), &identity, "msg", &mut log)
            .unwrap();

        let calls = git.calls();
        let commands: Vec<_> = calls.iter().map(|(_, c)| c.clone()).collect();
        assert_eq!(
            commands,
            vec![
                GitCommand::Config {
                    key: "user.email".to_string(),
                    value: "alice@example.com".to_string()
                },
                GitCommand::Config {
                    key: "user.name".to_string(),
                    value: "alice".to_string()
                },
                GitCommand::AddAll,
                GitCommand::Commit {
                    message: "msg".to_string()
                },
                GitCommand::Push,
            ]
        );
        assert!(calls.iter().all(|(cwd, _)| cwd == &handle().path));
    }

    #[test]
    fn test_nothing_to_commit_fails() {
        let git = ScriptedGit::new().fail_on(
            GitStep::Commit,
            1,
            "nothing to commit, working tree clean\n",
        );
        let mut log = ExportLog::new();
        let identity = CommitIdentity::new("bot", "bot@example.com");

        let err = CommitPublisher::new(&git)
            .publish(&handle(), &identity, "msg", &mut log)
            .unwrap_err();

        assert_eq!(err.step(), GitStep::Commit);
        assert!(!git.steps().contains(&GitStep::Push));
        assert!(log.render().contains("nothing to commit"));
    }

    #[test]
    fn test_rejected_push_fails() {
        let git = ScriptedGit::new().fail_on(GitStep::Push, 1, "! [rejected] master -> master\n");
        let mut log = ExportLog::new();
        let identity = CommitIdentity::new("bot", "bot@example.com");

        let err = CommitPublisher::new(&git)
            .publish(&handle(), &identity, "msg", &mut log)
            .unwrap_err();

        assert_eq!(err.step(), GitStep::Push);
        assert!(log.render().contains("[rejected]"));
    }
}
