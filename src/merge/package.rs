// ABOUTME: Packages a directory tree into a zip archive with sorted, stable entries.

use std::io::{Cursor, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::error::Result;
use crate::fs::FileHandler;

/// Zip the contents of `dir` into `target`.
pub fn package_directory<F: FileHandler>(files: &F, dir: &Path, target: &Path) -> Result<()> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    add_directory(files, &mut zip, dir, "")?;
    let bytes = zip.finish()?.into_inner();
    files.write(target, &bytes)?;
    Ok(())
}

fn add_directory<F: FileHandler>(
    files: &F,
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    dir: &Path,
    prefix: &str,
) -> Result<()> {
    let options = SimpleFileOptions::default();
    for child in files.children(dir)? {
        let name = format!("{prefix}{}", files.name(&child));
        if files.is_directory(&child) {
            let entry = format!("{name}/");
            zip.add_directory(entry.as_str(), options)?;
            add_directory(files, zip, &child, &entry)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&files.read(&child)?)
                .map_err(zip::result::ZipError::Io)?;
        }
    }
    Ok(())
}
