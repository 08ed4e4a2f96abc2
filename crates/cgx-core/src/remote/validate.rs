//! Remote URL validation

use std::fmt;
use thiserror::Error;
use url::Url;

/// Suffix every accepted remote URL ends with
pub const REPO_SUFFIX: &str = ".git";

/// Accepted remote schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteScheme {
    Https,
    Http,
    File,
}

impl RemoteScheme {
    fn detect(url: &str) -> Option<Self> {
        if url.starts_with("https:") {
            Some(Self::Https)
        } else if url.starts_with("http:") {
            Some(Self::Http)
        } else if url.starts_with("file:") {
            Some(Self::File)
        } else {
            None
        }
    }

    /// Whether pushes over this scheme need credentials in the URL
    pub fn needs_credentials(self) -> bool {
        matches!(self, Self::Https | Self::Http)
    }
}

impl fmt::Display for RemoteScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Https => write!(f, "https"),
            Self::Http => write!(f, "http"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Why a remote URL cannot be used for a headless push
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Non writable git url provided: {0}")]
    Malformed(String),

    #[error("Http url has no embedded username and password: {0}")]
    MissingCredentials(String),
}

/// Check that a remote can be pushed to without an interactive prompt.
///
/// The URL must end in `.git` and use http, https or file. The http family
/// must carry `user:password@` in its authority; file URLs are trusted.
pub fn validate_remote_url(url: &str) -> Result<RemoteScheme, UrlError> {
    let scheme = match RemoteScheme::detect(url) {
        Some(scheme) if url.ends_with(REPO_SUFFIX) => scheme,
        _ => return Err(UrlError::Malformed(redact_url(url))),
    };

    if scheme.needs_credentials() {
        let parsed = Url::parse(url).map_err(|_| UrlError::Malformed(redact_url(url)))?;
        if parsed.username().is_empty() || parsed.password().is_none() {
            return Err(UrlError::MissingCredentials(redact_url(url)));
        }
    }

    Ok(scheme)
}

/// Mask the password of a URL for logging
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("****")).is_ok() {
                parsed.to_string()
            } else {
                url.to_string()
            }
        }
        _ => url.to_string(),
    }
}
