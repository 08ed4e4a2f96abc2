//! Working-copy synchronization
//!
//! Brings `export_root/<name>` in line with the remote: a fresh clone when
//! the directory is absent, otherwise set-url, fetch, hard reset to the
//! remote tip of the current branch, then pull. The first failing git step
//! aborts the sequence. Nothing is rolled back; the next run's reset+pull
//! repairs a half-updated copy.

use crate::git::{run_step, GitBackend, GitCommand, GitStepError};
use crate::log::ExportLog;
use crate::types::RepositoryHandle;
use std::path::Path;

/// Keeps local working copies in step with their remotes
pub struct WorkingCopySync<'a> {
    git: &'a dyn GitBackend,
}

impl<'a> WorkingCopySync<'a> {
    pub fn new(git: &'a dyn GitBackend) -> Self {
        Self { git }
    }

    /// Clone or refresh the working copy for `remote_url`.
    ///
    /// `export_root` must already exist.
    pub fn synchronize(
        &self,
        export_root: &Path,
        dir_name: &str,
        remote_url: &str,
        log: &mut ExportLog,
    ) -> Result<RepositoryHandle, GitStepError> {
        let path = export_root.join(dir_name);

        if path.exists() {
            log.info("directory already exists, doing a git reset and pull instead of git clone");
            self.refresh(&path, remote_url, log)?;
        } else {
            run_step(
                self.git,
                export_root,
                &GitCommand::Clone {
                    url: remote_url.to_string(),
                    target: dir_name.to_string(),
                },
                log,
            )?;
        }

        let branch = self.current_branch(&path, log)?;

        Ok(RepositoryHandle {
            path,
            remote_url: remote_url.to_string(),
            branch,
        })
    }

    fn refresh(&self, path: &Path, remote_url: &str, log: &mut ExportLog) -> Result<(), GitStepError> {
        // A previous operator or export may have switched branches.
        let branch = self.current_branch(path, log)?;

        let commands = [
            GitCommand::SetRemoteUrl {
                url: remote_url.to_string(),
            },
            GitCommand::Fetch,
            GitCommand::ResetHard { branch },
            GitCommand::Pull,
        ];

        for command in &commands {
            run_step(self.git, path, command, log)?;
        }
        Ok(())
    }

    fn current_branch(&self, path: &Path, log: &mut ExportLog) -> Result<String, GitStepError> {
        let output = run_step(self.git, path, &GitCommand::CurrentBranch, log)?;
        Ok(output.output.trim().to_string())
    }
}
