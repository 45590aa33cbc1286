//! File publishing primitives for run outputs.
//!
//! Replacements go through a temp file in the destination directory followed
//! by a rename, so readers only ever observe the old or the new contents.
use crate::error::{AdvisorError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically replace `dest` with `bytes`.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = parent_dir(dest);
    fs::create_dir_all(parent)
        .map_err(|err| AdvisorError::io(format!("create {}", parent.display()), err))?;
    let mut tmp = NamedTempFile::new_in(parent)
        .map_err(|err| AdvisorError::io(format!("stage {}", dest.display()), err))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|err| AdvisorError::io(format!("stage {}", dest.display()), err))?;
    tmp.persist(dest)
        .map_err(|err| AdvisorError::io(format!("publish {}", dest.display()), err.error))?;
    Ok(())
}

/// Write `bytes` to a new file, never replacing an existing one.
///
/// Returns `Ok(false)` when `dest` already exists.
pub fn write_new(dest: &Path, bytes: &[u8]) -> Result<bool> {
    let parent = parent_dir(dest);
    fs::create_dir_all(parent)
        .map_err(|err| AdvisorError::io(format!("create {}", parent.display()), err))?;
    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
    {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(AdvisorError::io(format!("create {}", dest.display()), err)),
    };
    if let Err(err) = file.write_all(bytes) {
        drop(file);
        let _ = fs::remove_file(dest);
        return Err(AdvisorError::io(format!("write {}", dest.display()), err));
    }
    Ok(true)
}

/// Remove files created earlier in a run that failed later on.
pub fn rollback_created(created: &[PathBuf]) {
    for path in created {
        if path.exists() {
            if let Err(err) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %err, "rollback failed");
            }
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
