//! Git capability used by the export pipeline
//!
//! Every git operation the exporter needs is a [`GitCommand`]. A
//! [`GitBackend`] runs one command in a working directory and reports the
//! exit status together with combined stdout/stderr. [`SystemGit`] spawns
//! the real binary; tests drive the pipeline with a scripted backend.

mod system;

pub use system::SystemGit;

use crate::log::ExportLog;
use crate::remote::redact_url;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// The git operations the exporter performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStep {
    Clone,
    CurrentBranch,
    SetRemoteUrl,
    Fetch,
    ResetHard,
    Pull,
    Config,
    AddAll,
    Commit,
    Push,
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitStep::Clone => "clone",
            GitStep::CurrentBranch => "symbolic-ref",
            GitStep::SetRemoteUrl => "remote set-url",
            GitStep::Fetch => "fetch",
            GitStep::ResetHard => "reset",
            GitStep::Pull => "pull",
            GitStep::Config => "config",
            GitStep::AddAll => "add",
            GitStep::Commit => "commit",
            GitStep::Push => "push",
        };
        write!(f, "{}", name)
    }
}

/// One git invocation with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// Clone `url` into `target` under the working directory
    Clone { url: String, target: String },
    /// Name of the checked-out branch
    CurrentBranch,
    SetRemoteUrl { url: String },
    Fetch,
    /// Hard reset to `origin/<branch>`
    ResetHard { branch: String },
    Pull,
    Config { key: String, value: String },
    /// Stage every change including deletions
    AddAll,
    Commit { message: String },
    /// Quiet push to the tracked remote
    Push,
}

impl GitCommand {
    pub fn step(&self) -> GitStep {
        match self {
            GitCommand::Clone { .. } => GitStep::Clone,
            GitCommand::CurrentBranch => GitStep::CurrentBranch,
            GitCommand::SetRemoteUrl { .. } => GitStep::SetRemoteUrl,
            GitCommand::Fetch => GitStep::Fetch,
            GitCommand::ResetHard { .. } => GitStep::ResetHard,
            GitCommand::Pull => GitStep::Pull,
            GitCommand::Config { .. } => GitStep::Config,
            GitCommand::AddAll => GitStep::AddAll,
            GitCommand::Commit { .. } => GitStep::Commit,
            GitCommand::Push => GitStep::Push,
        }
    }

    /// Arguments passed to the git binary
    pub fn args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            GitCommand::Clone { url, target } => vec!["clone", "--", url.as_str(), target.as_str()],
            GitCommand::CurrentBranch => vec!["symbolic-ref", "--short", "HEAD"],
            GitCommand::SetRemoteUrl { url } => vec!["remote", "set-url", "origin", url.as_str()],
            GitCommand::Fetch => vec!["fetch", "origin"],
            GitCommand::ResetHard { branch } => {
                return vec![
                    "reset".to_string(),
                    "--hard".to_string(),
                    format!("origin/{}", branch),
                ]
            }
            GitCommand::Pull => vec!["pull"],
            GitCommand::Config { key, value } => vec!["config", key.as_str(), value.as_str()],
            GitCommand::AddAll => vec!["add", "--all", "."],
            GitCommand::Commit { message } => vec!["commit", "-a", "-m", message.as_str()],
            GitCommand::Push => vec!["push", "-q"],
        };
        args.into_iter().map(String::from).collect()
    }

    /// Command line for logs, with URL passwords masked
    pub fn display(&self) -> String {
        let args: Vec<String> = self
            .args()
            .iter()
            .map(|arg| if arg.contains("://") { redact_url(arg) } else { arg.clone() })
            .collect();
        format!("git {}", args.join(" "))
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Result of one git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    /// Exit code; `None` when killed by a signal
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
}

impl GitOutput {
    pub fn new(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs git commands
pub trait GitBackend: Send + Sync {
    /// Run `command` with `cwd` as working directory.
    ///
    /// Returns `Err` only when the process could not be started; a non-zero
    /// exit is reported through [`GitOutput::exit_code`].
    fn run(&self, cwd: &Path, command: &GitCommand) -> std::io::Result<GitOutput>;
}

/// A git step that did not complete
#[derive(Debug, Error)]
pub enum GitStepError {
    #[error("git {step} exited with status {}", format_code(.exit_code))]
    Exited { step: GitStep, exit_code: Option<i32> },

    #[error("git {step} could not be started: {source}")]
    Spawn {
        step: GitStep,
        #[source]
        source: std::io::Error,
    },
}

impl GitStepError {
    pub fn step(&self) -> GitStep {
        match self {
            GitStepError::Exited { step, .. } | GitStepError::Spawn { step, .. } => *step,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitStepError::Exited { exit_code, .. } => *exit_code,
            GitStepError::Spawn { .. } => None,
        }
    }
}

fn format_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string())
}

/// Run one command, record it and its output, and fail on non-zero exit
pub(crate) fn run_step(
    git: &dyn GitBackend,
    cwd: &Path,
    command: &GitCommand,
    log: &mut ExportLog,
) -> Result<GitOutput, GitStepError> {
    log.debug(format!(
        "Command was: {}. Working directory was: {}",
        command,
        cwd.display()
    ));

    let output = git.run(cwd, command).map_err(|source| {
        log.error(format!("Unable to run {}: {}", command, source));
        GitStepError::Spawn {
            step: command.step(),
            source,
        }
    })?;

    log.command_output(&output.output);

    if output.success() {
        Ok(output)
    } else {
        Err(GitStepError::Exited {
            step: command.step(),
            exit_code: output.exit_code,
        })
    }
}
