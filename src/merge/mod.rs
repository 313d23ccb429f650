// ABOUTME: WAR merging: descriptor merge rules, archive access, processors and packaging.

mod archive;
mod error;
mod merged;
mod package;
mod processor;
mod web_xml;

pub use archive::{WEB_XML, WarArchive};
pub use error::{MergeError, Result};
pub use merged::MergedWarArchive;
pub use package::package_directory;
pub use processor::{ArchiveResourceMerger, ConcatenatingProcessor, MergeProcessor};
pub use web_xml::WebXml;
