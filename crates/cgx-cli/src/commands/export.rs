//! Export command
//!
//! Export a course into a git repository and push it. Silent on success; the
//! step log goes to the tracing output.

use anyhow::{bail, Result};
use clap::Args;
use tracing::error;

use super::Settings;
use cgx_core::git::SystemGit;
use cgx_core::types::ExportRequest;
use cgx_core::GitExporter;

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Course locator, `org/course/run` (an `i4x://` prefix is accepted)
    pub course: String,

    /// Remote to push to; must end in `.git`
    pub git_url: String,

    /// User the commit is attributed to
    #[arg(long, short)]
    pub user: Option<String>,

    /// Working copy directory name under the export root
    #[arg(long, short)]
    pub repo_dir: Option<String>,
}

impl ExportArgs {
    fn request(&self) -> ExportRequest {
        let mut request = ExportRequest::new(&self.course, &self.git_url);
        if let Some(dir) = &self.repo_dir {
            request = request.with_repo_dir(dir);
        }
        if let Some(user) = &self.user {
            request = request.with_user(user);
        }
        request
    }
}

/// Execute the export command
pub fn execute(args: ExportArgs, settings: &Settings) -> Result<()> {
    let store = settings.open_store()?;
    let git = SystemGit::new();
    let exporter = GitExporter::new(&settings.config, &git, &store, &store);

    let outcome = exporter.export(&args.request());
    if let Some(failure) = outcome.failure() {
        error!(status = outcome.status().code(), "{}", failure);
        bail!("Course was not exported, check log output for details");
    }

    Ok(())
}
