//! Course XML tree writer
//!
//! Layout written under the target directory:
//!
//! ```text
//! course.xml                 pointer to the course run
//! course/<run>.xml           course root with chapter references
//! chapter/<url_name>.xml     one per chapter with unit references
//! html/<url_name>.xml        unit metadata
//! html/<url_name>.html       unit body
//! ```
//!
//! Generated paths are removed before writing so content deleted from the
//! course disappears from the tree. Anything else in the directory, such as
//! `.git`, is left alone.

use crate::model::{CourseRecord, HtmlUnit};
use cgx_core::error::{CgxError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

const GENERATED_DIRS: [&str; 3] = ["course", "chapter", "html"];
const POINTER_FILE: &str = "course.xml";

/// Writes a course record as an XML directory tree
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlTreeWriter;

impl XmlTreeWriter {
    pub fn new() -> Self {
        Self
    }

    /// Replace the generated tree under `target` with `record`
    pub fn write(&self, record: &CourseRecord, target: &Path) -> Result<()> {
        let locator = record.locator();
        let display_name = record
            .display_name
            .as_deref()
            .ok_or_else(|| CgxError::MissingAttribute {
                course: locator.to_string(),
                attribute: "display_name".to_string(),
            })?;

        check_name(&record.run)?;
        for chapter in &record.chapters {
            check_name(&chapter.url_name)?;
            for unit in &chapter.units {
                check_name(&unit.url_name)?;
            }
        }

        fs::create_dir_all(target)?;
        self.clear(target)?;
        for dir in GENERATED_DIRS {
            fs::create_dir_all(target.join(dir))?;
        }

        fs::write(
            target.join(POINTER_FILE),
            format!(
                "<course url_name=\"{}\" org=\"{}\" course=\"{}\"/>\n",
                escape(&record.run),
                escape(&record.org),
                escape(&record.course)
            ),
        )?;

        let mut root = format!("<course display_name=\"{}\">\n", escape(display_name));
        for chapter in &record.chapters {
            root.push_str(&format!("  <chapter url_name=\"{}\"/>\n", escape(&chapter.url_name)));
        }
        root.push_str("</course>\n");
        fs::write(target.join("course").join(format!("{}.xml", record.run)), root)?;

        for chapter in &record.chapters {
            let mut xml = format!("<chapter display_name=\"{}\">\n", escape(&chapter.display_name));
            for unit in &chapter.units {
                xml.push_str(&format!("  <html url_name=\"{}\"/>\n", escape(&unit.url_name)));
                self.write_unit(target, unit)?;
            }
            xml.push_str("</chapter>\n");
            fs::write(
                target.join("chapter").join(format!("{}.xml", chapter.url_name)),
                xml,
            )?;
        }

        debug!("Wrote course {} to {:?}", locator, target);
        Ok(())
    }

    fn write_unit(&self, target: &Path, unit: &HtmlUnit) -> Result<()> {
        let html_dir = target.join("html");
        fs::write(
            html_dir.join(format!("{}.xml", unit.url_name)),
            format!(
                "<html filename=\"{}\" display_name=\"{}\"/>\n",
                escape(&unit.url_name),
                escape(&unit.display_name)
            ),
        )?;
        fs::write(html_dir.join(format!("{}.html", unit.url_name)), &unit.body)?;
        Ok(())
    }

    fn clear(&self, target: &Path) -> Result<()> {
        for dir in GENERATED_DIRS {
            let path = target.join(dir);
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            }
        }
        let pointer = target.join(POINTER_FILE);
        if pointer.exists() {
            fs::remove_file(pointer)?;
        }
        Ok(())
    }
}

/// Names become file names; keep them to one plain segment
fn check_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CgxError::Validation(format!("'{}' is not a valid url_name", name)))
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
