//! Temporary workspace for a single deployment run.
//!
//! The workspace is a uniquely named directory under the system temp dir (or
//! a configured root) that holds the cloned repository and the build output.
//! It is owned by exactly one run and removed exactly once when the run ends,
//! unless the caller asks to keep it for debugging.

use crate::error::{DeployError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Prefix for workspace directory names.
pub const WORKSPACE_PREFIX: &str = "sitedeploy-";

/// Handle to the temporary directory of one run.
///
/// Dropping a handle that was never finished removes the directory.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh workspace under the system temp dir.
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a fresh workspace under `root`.
    ///
    /// The directory name is `sitedeploy-` followed by a random suffix, so
    /// concurrent runs on the same machine never share a path.
    pub fn create_in<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .rand_bytes(12)
            .tempdir_in(root)
            .map_err(|e| DeployError::Workspace(format!("'{}': {}", root.display(), e)))?;

        debug!(path = %dir.path().display(), "created workspace");
        Ok(Self { dir })
    }

    /// Path to the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// End the workspace's lifetime.
    ///
    /// With `keep` set the directory stays on disk and its path is returned.
    /// Otherwise it is removed; a removal failure is logged, never returned.
    pub fn finish(self, keep: bool) -> Option<PathBuf> {
        if keep {
            let path = self.dir.keep();
            info!("Keeping workspace at {}", path.display());
            return Some(path);
        }

        let path = self.dir.path().to_path_buf();
        debug!(path = %path.display(), "removing workspace");
        if let Err(e) = self.dir.close() {
            warn!("failed to remove workspace '{}': {}", path.display(), e);
        }
        None
    }
}
