//! Working directory naming

use super::validate::REPO_SUFFIX;

/// Used when neither the override nor the URL yields a usable segment
const FALLBACK_DIR_NAME: &str = "repo";

/// Derive the working-copy directory name for a remote.
///
/// An explicit override wins but only its final path segment is kept, so
/// `../../etc/x` becomes `x`. Otherwise the URL's last segment is used with
/// a trailing `.git` removed. Segments starting with `-` are never used. Remotes that share a final segment map to the
/// same directory.
pub fn repo_dir_name(remote_url: &str, override_name: Option<&str>) -> String {
    if let Some(name) = override_name.and_then(last_segment) {
        return name.to_string();
    }

    let tail = remote_url.rsplit('/').next().unwrap_or(remote_url);
    let name = tail.strip_suffix(REPO_SUFFIX).unwrap_or(tail);
    match last_segment(name) {
        Some(name) => name.to_string(),
        None => FALLBACK_DIR_NAME.to_string(),
    }
}

fn last_segment(path: &str) -> Option<&str> {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .find(|s| !s.is_empty())
        .filter(|s| *s != "." && *s != ".." && !s.starts_with('-'))
}
