//! File system storage for courses

use crate::model::CourseRecord;
use crate::xml::XmlTreeWriter;
use cgx_core::content::{AccessPolicy, ContentExporter, CourseCatalog};
use cgx_core::error::{CgxError, Result};
use cgx_core::types::CourseLocator;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File system based course and user storage
///
/// Courses live at `courses/<org>/<course>/<run>.json`, users in
/// `users.toml`.
pub struct FileSystemStore {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Courses subdirectory
    courses_dir: PathBuf,
    /// User accounts file
    pub(crate) users_path: PathBuf,
    writer: XmlTreeWriter,
}

impl FileSystemStore {
    /// Create a new file system store
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let courses_dir = base_dir.join("courses");
        let users_path = base_dir.join("users.toml");

        let store = Self {
            base_dir,
            courses_dir,
            users_path,
            writer: XmlTreeWriter::new(),
        };

        store.ensure_dirs()?;
        Ok(store)
    }

    /// Create a store in the platform data directory (~/.cgx as fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// The platform data directory used by [`Self::default_location`]
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("org", "cgx", "cgx")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".cgx")
            })
    }

    fn ensure_dirs(&self) -> Result<()> {
        if !self.courses_dir.exists() {
            fs::create_dir_all(&self.courses_dir).map_err(|e| {
                CgxError::from(e).with_context(format!(
                    "Failed to create courses directory {:?}",
                    self.courses_dir
                ))
            })?;
            debug!("Created courses directory: {:?}", self.courses_dir);
        }
        Ok(())
    }

    fn course_path(&self, locator: &CourseLocator) -> PathBuf {
        self.courses_dir
            .join(&locator.org)
            .join(&locator.course)
            .join(format!("{}.json", locator.run))
    }

    fn temp_path(&self, locator: &CourseLocator) -> PathBuf {
        self.courses_dir
            .join(&locator.org)
            .join(&locator.course)
            .join(format!(".{}.json.tmp", locator.run))
    }

    /// Save a course (write to temp, then rename)
    pub fn save_course(&self, record: &CourseRecord) -> Result<()> {
        let locator = record.locator();
        let final_path = self.course_path(&locator);
        let temp_path = self.temp_path(&locator);

        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        {
            let file = fs::File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            CgxError::from(e).with_context(format!("Failed to save course {}", locator))
        })?;

        debug!("Saved course {} to {:?}", locator, final_path);
        Ok(())
    }

    /// Load a course by locator
    pub fn load_course(&self, locator: &CourseLocator) -> Result<CourseRecord> {
        let path = self.course_path(locator);
        let file = fs::File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CgxError::CourseNotFound(locator.to_string())
            } else {
                CgxError::Io(e)
            }
        })?;

        let record: CourseRecord = serde_json::from_reader(BufReader::new(file))?;
        if record.locator() != *locator {
            return Err(CgxError::Validation(format!(
                "{:?} holds course {}, expected {}",
                path,
                record.locator(),
                locator
            )));
        }
        Ok(record)
    }

    pub fn course_exists(&self, locator: &CourseLocator) -> bool {
        self.course_path(locator).exists()
    }

    /// Store the remote a course is pushed to
    pub fn set_git_url(&self, locator: &CourseLocator, url: Option<String>) -> Result<()> {
        let mut record = self.load_course(locator)?;
        record.giturl = url;
        self.save_course(&record)
    }

    /// All stored courses, sorted by locator
    pub fn list_courses(&self) -> Result<Vec<CourseRecord>> {
        let mut courses = Vec::new();

        for org in read_subdirs(&self.courses_dir)? {
            for course in read_subdirs(&org)? {
                for entry in fs::read_dir(&course)? {
                    let path = match entry {
                        Ok(e) => e.path(),
                        Err(e) => {
                            warn!("Failed to read directory entry: {}", e);
                            continue;
                        }
                    };

                    if !is_course_file(&path) {
                        continue;
                    }

                    match read_record(&path) {
                        Ok(record) => courses.push(record),
                        Err(e) => warn!("Failed to read course file {:?}: {}", path, e),
                    }
                }
            }
        }

        courses.sort_by_key(|c| c.locator().to_string());
        Ok(courses)
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn courses_dir(&self) -> &PathBuf {
        &self.courses_dir
    }
}

fn read_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

// Skip non-json files and temp files
fn is_course_file(path: &Path) -> bool {
    let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false);
    is_json && !hidden
}

fn read_record(path: &Path) -> Result<CourseRecord> {
    let file = fs::File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

impl ContentExporter for FileSystemStore {
    fn export_course(&self, course: &CourseLocator, root_dir: &Path, course_dir: &str) -> Result<()> {
        let record = self.load_course(course)?;
        self.writer.write(&record, &root_dir.join(course_dir))
    }
}

impl CourseCatalog for FileSystemStore {
    fn git_url(&self, course: &CourseLocator) -> Result<Option<String>> {
        Ok(self.load_course(course)?.giturl)
    }
}

impl AccessPolicy for FileSystemStore {
    fn has_access(&self, username: &str, course: &CourseLocator) -> bool {
        match self.find_account(username) {
            Ok(Some(account)) if account.is_staff => return true,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read users for access check: {}", e);
                return false;
            }
        }

        match self.load_course(course) {
            Ok(record) => record.staff.iter().any(|s| s == username),
            Err(_) => false,
        }
    }
}
