//! File moves between the active and archive directories.
//!
//! A move is a `rename(2)` when possible. Some mounts report `EXDEV` even for
//! paths that look local; then the file is copied with an atomic write and the
//! source removed.

use crate::error::{DexError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Move `source` to `destination`, replacing any existing file.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DexError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => copy_then_remove(source, destination),
        Err(e) => Err(DexError::UserError(format!(
            "failed to move '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))),
    }
}

/// Move `source` to `destination`, refusing to overwrite an existing file.
pub fn move_file_no_clobber<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if destination.exists() {
        return Err(DexError::UserError(format!(
            "refusing to overwrite existing file '{}'",
            destination.display()
        )));
    }
    if !source.is_file() {
        return Err(DexError::UserError(format!(
            "nothing to move: '{}' does not exist",
            source.display()
        )));
    }
    move_file(source, destination)
}

fn copy_then_remove(source: &Path, destination: &Path) -> Result<()> {
    let content = fs::read(source).map_err(|e| {
        DexError::UserError(format!(
            "failed to read '{}' for cross-device move: {}",
            source.display(),
            e
        ))
    })?;

    crate::fs::atomic_write(destination, &content)?;

    fs::remove_file(source).map_err(|e| {
        DexError::UserError(format!(
            "copied '{}' across devices but failed to remove it: {}",
            source.display(),
            e
        ))
    })
}

fn is_cross_device(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}
