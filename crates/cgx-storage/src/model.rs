//! Stored course records

use cgx_core::types::CourseLocator;
use serde::{Deserialize, Serialize};

/// A course as persisted in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub org: String,
    pub course: String,
    pub run: String,
    /// Required for export
    #[serde(default)]
    pub display_name: Option<String>,
    /// Remote the course is pushed to
    #[serde(default)]
    pub giturl: Option<String>,
    /// Users allowed to push this course
    #[serde(default)]
    pub staff: Vec<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl CourseRecord {
    pub fn new(locator: &CourseLocator, display_name: impl Into<String>) -> Self {
        Self {
            org: locator.org.clone(),
            course: locator.course.clone(),
            run: locator.run.clone(),
            display_name: Some(display_name.into()),
            giturl: None,
            staff: Vec::new(),
            chapters: Vec::new(),
        }
    }

    pub fn locator(&self) -> CourseLocator {
        CourseLocator::new(&self.org, &self.course, &self.run)
    }
}

/// Top-level section of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub url_name: String,
    pub display_name: String,
    #[serde(default)]
    pub units: Vec<HtmlUnit>,
}

/// A block of HTML content inside a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlUnit {
    pub url_name: String,
    pub display_name: String,
    #[serde(default)]
    pub body: String,
}
