//! Course command
//!
//! Manage stored courses.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::PathBuf;

use super::Settings;
use cgx_core::remote::{redact_url, validate_remote_url};
use cgx_core::types::CourseLocator;
use cgx_storage::CourseRecord;

/// Course subcommands
#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// List stored courses
    List {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store a course from a JSON file
    Import {
        /// Course record file
        file: PathBuf,
    },

    /// Set the git URL a course is pushed to
    SetUrl {
        /// Course locator, `org/course/run`
        course: String,

        /// Remote URL; omit to clear it
        url: Option<String>,
    },
}

/// Execute the course command
pub fn execute(cmd: CourseCommand, settings: &Settings) -> Result<()> {
    match cmd {
        CourseCommand::List { json } => list_courses(settings, json),
        CourseCommand::Import { file } => import_course(settings, file),
        CourseCommand::SetUrl { course, url } => set_url(settings, &course, url),
    }
}

fn list_courses(settings: &Settings, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let store = settings.open_store()?;
    let courses = store.list_courses()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
        return Ok(());
    }

    if courses.is_empty() {
        println!("No courses stored in {}", store.base_dir().display());
        return Ok(());
    }

    for course in &courses {
        let name = course.display_name.as_deref().unwrap_or("(no display name)");
        let url = course
            .giturl
            .as_deref()
            .map(redact_url)
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {}  {}", course.locator().to_string().cyan(), name, url.dimmed());
    }
    Ok(())
}

fn import_course(settings: &Settings, file: PathBuf) -> Result<()> {
    use colored::Colorize;

    let content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let record: CourseRecord = serde_json::from_str(&content)
        .with_context(|| format!("Invalid course record in {}", file.display()))?;

    // Reject records whose ids cannot be stored as a path
    let locator = CourseLocator::parse(&record.locator().to_string())?;

    let store = settings.open_store()?;
    let verb = if store.course_exists(&locator) { "Updated" } else { "Stored" };
    store.save_course(&record)?;
    println!("{} {} {}", "✓".green(), verb, locator);
    Ok(())
}

fn set_url(settings: &Settings, course: &str, url: Option<String>) -> Result<()> {
    use colored::Colorize;

    let locator = CourseLocator::parse(course)
        .with_context(|| format!("Invalid course '{}'", course))?;

    if let Some(url) = &url {
        if let Err(e) = validate_remote_url(url) {
            eprintln!("{} {}; exports will fail until it is fixed", "⚠".yellow(), e);
        }
    }

    let store = settings.open_store()?;
    store.set_git_url(&locator, url.clone())?;

    match url {
        Some(url) => println!("{} {} -> {}", "✓".green(), locator, redact_url(&url)),
        None => println!("{} Cleared git URL of {}", "✓".green(), locator),
    }
    Ok(())
}
