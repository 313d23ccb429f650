// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing init, zip fixture builders and a recording file handler.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use cargolift::fs::{FileHandler, LocalFileHandler};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("cargolift=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Zip `entries` in memory.
#[allow(dead_code)]
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Write a zip archive with `entries` to `path`.
#[allow(dead_code)]
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    std::fs::write(path, zip_bytes(entries)).unwrap();
    path.to_path_buf()
}

/// Entry names of the zip at `path`.
#[allow(dead_code)]
pub fn zip_entries(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// A `web-app` descriptor wrapping `body`.
#[allow(dead_code)]
pub fn web_xml(body: &str) -> Vec<u8> {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><web-app version="2.5">{body}</web-app>"#)
        .into_bytes()
}

/// Local file handler that records every mutating call.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingFileHandler {
    inner: LocalFileHandler,
    pub calls: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingFileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FileHandler for RecordingFileHandler {
    fn copy_file(&self, source: &Path, target: &Path, overwrite: bool) -> cargolift::fs::Result<()> {
        self.record(format!("copy_file {}", target.display()));
        self.inner.copy_file(source, target, overwrite)
    }

    fn copy_directory(&self, source: &Path, target: &Path) -> cargolift::fs::Result<()> {
        self.record(format!("copy_directory {}", target.display()));
        self.inner.copy_directory(source, target)
    }

    fn mkdirs(&self, path: &Path) -> cargolift::fs::Result<()> {
        self.record(format!("mkdirs {}", path.display()));
        self.inner.mkdirs(path)
    }

    fn delete(&self, path: &Path) -> cargolift::fs::Result<()> {
        self.record(format!("delete {}", path.display()));
        self.inner.delete(path)
    }

    fn read(&self, path: &Path) -> cargolift::fs::Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> cargolift::fs::Result<()> {
        self.record(format!("write {}", path.display()));
        self.inner.write(path, contents)
    }

    fn children(&self, dir: &Path) -> cargolift::fs::Result<Vec<PathBuf>> {
        self.inner.children(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.inner.is_directory(path)
    }
}
