//! Configuration management for cgx
//!
//! Read once at startup and treated as constant for the life of the process.

use crate::types::CommitIdentity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the export working copies
pub const DEFAULT_EXPORT_DIR: &str = "/edx/var/edxapp/export_course_repos";

/// Identity used when the acting user cannot be resolved
pub const DEFAULT_IDENTITY_NAME: &str = "STUDIO_PUSH_TO_LMS";
pub const DEFAULT_IDENTITY_EMAIL: &str = "STUDIO_PUSH_TO_LMS@example.com";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export settings
    pub export: ExportConfig,
    /// Default commit identity
    pub identity: IdentityConfig,
    /// Course and user storage
    pub storage: StorageConfig,
}

impl Config {
    /// The default identity as a commit identity
    pub fn default_identity(&self) -> CommitIdentity {
        CommitIdentity::new(&self.identity.name, &self.identity.email)
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory holding one working copy per remote
    pub repo_export_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            repo_export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Default commit identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub name: String,
    pub email: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_IDENTITY_NAME.to_string(),
            email: DEFAULT_IDENTITY_EMAIL.to_string(),
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory; the platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.export.repo_export_dir,
            PathBuf::from("/edx/var/edxapp/export_course_repos")
        );
        assert_eq!(config.identity.name, "STUDIO_PUSH_TO_LMS");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_default_identity() {
        let identity = Config::default().default_identity();
        assert_eq!(identity.email, "STUDIO_PUSH_TO_LMS@example.com");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[export]"));
        assert!(toml.contains("[identity]"));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.export.repo_export_dir, config2.export.repo_export_dir);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[identity]
name = "Course Bot"
"#,
        )
        .unwrap();
        assert_eq!(config.identity.name, "Course Bot");
        assert_eq!(config.identity.email, DEFAULT_IDENTITY_EMAIL);
        assert_eq!(config.export.repo_export_dir, PathBuf::from(DEFAULT_EXPORT_DIR));
    }
}
