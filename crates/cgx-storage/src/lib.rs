//! cgx-storage - Storage library for cgx
//!
//! Filesystem-backed implementations of the collaborators the exporter
//! consumes: course records, user accounts and the XML tree writer.

mod course_store;
mod model;
mod user_store;
mod xml;

pub use course_store::FileSystemStore;
pub use model::{Chapter, CourseRecord, HtmlUnit};
pub use xml::XmlTreeWriter;
