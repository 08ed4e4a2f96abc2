//! Git backend that spawns the system `git` binary

use super::{GitBackend, GitCommand, GitOutput};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::trace;

/// Runs git as a blocking child process
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: OsString,
}

impl SystemGit {
    /// Use `git` from `PATH`
    pub fn new() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Report the installed git version, if git can be run at all
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.program).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout);
        Some(version.trim().replace("git version ", ""))
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitBackend for SystemGit {
    fn run(&self, cwd: &Path, command: &GitCommand) -> std::io::Result<GitOutput> {
        trace!("spawning {} in {}", command, cwd.display());

        // No terminal is attached; a credential prompt must fail, not block.
        let output = Command::new(&self.program)
            .args(command.args())
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(GitOutput::new(output.status.code(), combined))
    }
}
