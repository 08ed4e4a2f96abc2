//! Error types for cgx

use thiserror::Error;

/// Main error type for cgx
#[derive(Debug, Error)]
pub enum CgxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Course locator could not be parsed
    #[error("Invalid course locator: {0}")]
    InvalidLocator(String),

    /// Course not found in the content store
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// Course object lacks an attribute the exporter needs
    #[error("Course {course} has no {attribute}")]
    MissingAttribute { course: String, attribute: String },

    /// Caller may not act on the course
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CgxError>,
    },
}

impl CgxError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CgxError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for cgx
pub type Result<T> = std::result::Result<T, CgxError>;
