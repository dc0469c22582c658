//! File locking utilities for the file-backed record store
//!
//! Each contract document has a sibling `.lock` file. Writers hold an
//! exclusive `fs2` advisory lock on it for the whole read-modify-write and
//! publish the new document with write-to-temp + rename, so a reader holding
//! the shared lock always sees a complete document.
//!
//! Advisory locks are cooperative: every process touching the data directory
//! must go through these functions.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A held advisory lock. Released when dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    fn open(path: &Path) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))
    }

    /// Block until an exclusive (write) lock is acquired.
    pub fn exclusive(path: &Path) -> Result<Self> {
        let file = Self::open(path)?;
        FileExt::lock_exclusive(&file)
            .with_context(|| format!("Failed to acquire exclusive lock: {}", path.display()))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Block until a shared (read) lock is acquired.
    pub fn shared(path: &Path) -> Result<Self> {
        let file = Self::open(path)?;
        FileExt::lock_shared(&file)
            .with_context(|| format!("Failed to acquire shared lock: {}", path.display()))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Read a file, returning `None` if it does not exist.
pub fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {}", path.display())),
    }
}

/// Replace `path` with `content` atomically.
///
/// Writes a temp file in the same directory, syncs it, then renames it over
/// the target. Concurrent writers must hold the matching [`FileLock`].
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file path: {}", path.display()))?;
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let file = File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file: {}", tmp_path.display()))?;
    let mut writer = BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", tmp_path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush file: {}", tmp_path.display()))?;
    drop(writer);
    file.sync_all()
        .with_context(|| format!("Failed to sync file: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to move {} into place at {}",
            tmp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}
