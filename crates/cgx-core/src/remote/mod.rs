//! Remote repository naming and URL validation
//!
//! Everything here is pure string work and runs before the orchestrator
//! touches the filesystem or spawns git.

mod locator;
mod validate;

pub use locator::repo_dir_name;
pub use validate::{redact_url, validate_remote_url, RemoteScheme, UrlError, REPO_SUFFIX};
