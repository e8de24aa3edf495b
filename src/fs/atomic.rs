//! Atomic file writes.
//!
//! Content is written to `.{name}.tmp` next to the target, synced, then renamed
//! over the target. Source and target share a directory, so the rename stays on
//! one filesystem. A crash can leave the temp file behind but never a truncated
//! target.

use crate::error::{DexError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to `path`, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            DexError::UserError(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_synced(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DexError::UserError(format!("failed to replace '{}': {}", path.display(), e))
    })?;

    // Persist the directory entry too; failure here is not fatal.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Atomically write a string to `path`.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            DexError::UserError(format!("invalid file path '{}'", target.display()))
        })?;
    let temp_name = format!(".{}.tmp", filename);
    Ok(match target.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        DexError::UserError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let written = file.write_all(content).and_then(|_| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(DexError::UserError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.yaml");

        atomic_write_file(&path, "version: 1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "version: 1\n");
    }

    #[test]
    fn test_replace_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.yaml");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp_dir.path().join(".ledger.yaml.tmp").exists());
    }

    #[test]
    fn test_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".agentdex").join("events.ndjson");

        atomic_write(&path, b"").unwrap();

        assert!(path.exists());
        assert!(fs::read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/corpus/agents/a.md")).unwrap();
        assert_eq!(temp, PathBuf::from("/corpus/agents/.a.md.tmp"));
    }
}
