//! Whole-file reads and crash-safe rewrites.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Read `path` to a string, or `None` if the file does not exist.
///
/// # Errors
///
/// Returns [`StoreError::Read`] for any failure other than a missing file.
pub fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace `path` with `contents`.
///
/// The data is written to a `.tmp` sibling, synced, then renamed over the
/// target, so a crash leaves either the old file or the new one. The parent
/// directory is created if needed and the `.tmp` file is removed on failure.
///
/// # Errors
///
/// Returns [`StoreError::Write`] if any step fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = tmp_sibling(path);
    let written = write_and_sync(&tmp_path, contents);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }
    Ok(())
}

fn write_and_sync(path: &Path, contents: &str) -> std::io::Result<()> {
    let file: File = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// `friends.txt` -> `friends.txt.tmp`
fn tmp_sibling(path: &Path) -> PathBuf {
    let filename = path
        .file_name()
        .map_or_else(|| "snapshot".to_owned(), |f| f.to_string_lossy().into_owned());
    path.with_file_name(format!("{filename}.tmp"))
}
