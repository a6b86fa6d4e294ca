//! Copy extra deployment files into the workspace.
//!
//! Each pair replaces its destination wholesale: whatever was at `dest`
//! (file, symlink or directory tree) is removed first, then `src` is copied
//! over. Running the same pairs twice yields the same tree as running them
//! once. Pairs are applied in order, so a later pair wins on collision.

use crate::error::{DeployError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A source/destination pair with both paths already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPair {
    pub src: PathBuf,
    pub dest: PathBuf,
}

/// Apply every pair in order.
pub fn sync_files(pairs: &[CopyPair]) -> Result<()> {
    for pair in pairs {
        replace_path(&pair.src, &pair.dest)?;
    }
    Ok(())
}

/// Replace `dest` with a copy of `src` (file or directory).
pub fn replace_path(src: &Path, dest: &Path) -> Result<()> {
    if !src.exists() {
        return Err(DeployError::Filesystem(format!(
            "deployment file source '{}' does not exist",
            src.display()
        )));
    }

    debug!(src = %src.display(), dest = %dest.display(), "copying deployment file");
    remove_path(dest)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DeployError::Filesystem(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    if src.is_dir() {
        copy_tree(src, dest)
    } else {
        copy_file(src, dest)
    }
}

/// Remove a file, symlink or directory tree. A missing path is not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(remove_error(path, e)),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| remove_error(path, e))
}

fn remove_error(path: &Path, e: io::Error) -> DeployError {
    DeployError::Filesystem(format!("failed to remove '{}': {}", path.display(), e))
}

fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(|e| {
        DeployError::Filesystem(format!(
            "failed to copy '{}' to '{}': {}",
            src.display(),
            dest.display(),
            e
        ))
    })?;
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            DeployError::Filesystem(format!("failed to walk '{}': {}", src.display(), e))
        })?;

        // Entries yielded by WalkDir::new(src) always live under src.
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                DeployError::Filesystem(format!(
                    "failed to create directory '{}': {}",
                    target.display(),
                    e
                ))
            })?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}
