// ABOUTME: Pluggable per-path resource mergers run after the archives are expanded.
// ABOUTME: Each processor collects one resource from every source and writes the combined result.

use std::path::Path;

use super::archive::WarArchive;
use super::error::{MergeError, Result};
use crate::fs::FileHandler;

/// Combines the copies of one resource found in several archives.
pub trait MergeProcessor: Send + Sync {
    fn add_merge_item(&mut self, item: Vec<u8>) -> Result<()>;

    /// Produce the merged resource and reset the collected items.
    ///
    /// `None` leaves whatever the expansion wrote in place.
    fn execute(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Binds a [`MergeProcessor`] to a resource path inside the archives.
pub struct ArchiveResourceMerger {
    path: String,
    processor: Box<dyn MergeProcessor>,
}

impl ArchiveResourceMerger {
    pub fn new(path: impl Into<String>, processor: impl MergeProcessor + 'static) -> Self {
        Self {
            path: path.into().trim_start_matches('/').to_string(),
            processor: Box::new(processor),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Feed the resource from `war`, if it has one.
    pub fn add_merge_item(&mut self, war: &WarArchive) -> Result<()> {
        match war.resource(&self.path)? {
            Some(bytes) => self.processor.add_merge_item(bytes),
            None => Ok(()),
        }
    }

    /// Write the merged resource below `dir`.
    pub fn execute<F: FileHandler>(&mut self, dir: &Path, files: &F) -> Result<()> {
        if let Some(merged) = self.processor.execute()? {
            files.write(&dir.join(&self.path), &merged)?;
        }
        Ok(())
    }
}

/// Line union of text resources such as `META-INF/services/*` files.
///
/// Lines keep first-seen order; blank lines and repeats are dropped.
#[derive(Debug, Default)]
pub struct ConcatenatingProcessor {
    items: Vec<Vec<u8>>,
}

impl ConcatenatingProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MergeProcessor for ConcatenatingProcessor {
    fn add_merge_item(&mut self, item: Vec<u8>) -> Result<()> {
        self.items.push(item);
        Ok(())
    }

    fn execute(&mut self) -> Result<Option<Vec<u8>>> {
        let items = std::mem::take(&mut self.items);
        if items.is_empty() {
            return Ok(None);
        }

        let mut lines: Vec<String> = Vec::new();
        for item in &items {
            let text = std::str::from_utf8(item).map_err(|e| MergeError::Processor {
                path: String::from("<text resource>"),
                reason: e.to_string(),
            })?;
            for line in text.lines().map(str::trim_end).filter(|l| !l.trim().is_empty()) {
                if !lines.iter().any(|l| l == line) {
                    lines.push(line.to_string());
                }
            }
        }

        let mut merged = lines.join("\n");
        merged.push('\n');
        Ok(Some(merged.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_keeps_first_seen_order() {
        let mut p = ConcatenatingProcessor::new();
        p.add_merge_item(b"com.a.Impl\ncom.b.Impl\n".to_vec()).unwrap();
        p.add_merge_item(b"com.b.Impl\n\ncom.c.Impl".to_vec()).unwrap();
        let out = p.execute().unwrap().unwrap();
        assert_eq!(out, b"com.a.Impl\ncom.b.Impl\ncom.c.Impl\n");
    }

    #[test]
    fn execute_resets_items() {
        let mut p = ConcatenatingProcessor::new();
        p.add_merge_item(b"x".to_vec()).unwrap();
        assert!(p.execute().unwrap().is_some());
        assert!(p.execute().unwrap().is_none());
    }
}
