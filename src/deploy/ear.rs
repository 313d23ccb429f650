// ABOUTME: Reads the web modules declared in an EAR's META-INF/application.xml.
// ABOUTME: Works on both packed archives and expanded directories.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use xmltree::{Element, XMLNode};

use super::deployable::Ear;
use super::error::DescriptorError;
use crate::types::WebContext;

const APPLICATION_XML: &str = "META-INF/application.xml";

impl Ear {
    /// Load an EAR and read its web contexts from `application.xml`.
    ///
    /// An EAR without a descriptor claims no web contexts.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let expanded = path.is_dir();
        let contexts = match read_application_xml(path)? {
            Some(bytes) => web_contexts(&bytes)?,
            None => Vec::new(),
        };
        tracing::debug!(
            "EAR {} declares web contexts {:?}",
            path.display(),
            contexts
        );
        Ok(Ear::new(path)
            .with_web_contexts(contexts.iter().map(WebContext::as_str))
            .set_expanded(expanded))
    }
}

fn read_application_xml(path: &Path) -> Result<Option<Vec<u8>>, DescriptorError> {
    if path.is_dir() {
        let descriptor = path.join(APPLICATION_XML);
        if !descriptor.is_file() {
            return Ok(None);
        }
        return std::fs::read(&descriptor)
            .map(Some)
            .map_err(|e| DescriptorError::Io {
                path: descriptor,
                source: e,
            });
    }

    let file = File::open(path).map_err(|e| DescriptorError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DescriptorError::Archive {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut entry = match archive.by_name(APPLICATION_XML) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(DescriptorError::Archive {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| DescriptorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(Some(bytes))
}

/// Extract `<module><web>` context roots; a missing `context-root` falls back
/// to the web-uri without its `.war` suffix.
fn web_contexts(bytes: &[u8]) -> Result<Vec<WebContext>, DescriptorError> {
    let root = Element::parse(bytes)?;
    let contexts = root
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(|e| e.name == "module")
        .filter_map(|module| module.get_child("web"))
        .filter_map(|web| {
            let text = |name: &str| {
                web.get_child(name)
                    .and_then(|c| c.get_text())
                    .map(|t| t.trim().to_string())
            };
            text("context-root").or_else(|| {
                text("web-uri").map(|uri| uri.trim_end_matches(".war").to_string())
            })
        })
        .map(|c| WebContext::new(&c))
        .collect();
    Ok(contexts)
}
