//! Static config file model.

use super::types::DeploymentFile;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Contents of `sitedeploy.yaml`.
///
/// Every key is optional; CLI flags override whatever is set here. Unknown
/// keys are ignored for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    // =========================================================================
    // Target
    // =========================================================================
    /// Repository URL to deploy to.
    pub remote: Option<String>,

    /// Branch that receives the site (e.g. `gh-pages`).
    pub branch: Option<String>,

    /// Commit message.
    pub message: Option<String>,

    /// Subdirectory of the branch that receives the build.
    pub folder: Option<PathBuf>,

    /// Commit author name.
    pub name: Option<String>,

    /// Commit author email. Requires `name`.
    pub email: Option<String>,

    // =========================================================================
    // Build
    // =========================================================================
    /// Command that builds the site into `{target}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    /// Prebuilt site directory, used when `build_command` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Extra files copied into the workspace after the build.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deployment_files: Vec<DeploymentFile>,

    /// Links the builder should leave out.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_links: Vec<String>,

    /// Links the builder should add.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_links: Vec<String>,

    /// Globs (relative to the build target) removed before building.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delete_patterns: Vec<String>,

    // =========================================================================
    // Workspace
    // =========================================================================
    /// Parent directory for the temporary workspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Keep the workspace after the run (same as `--debug`).
    pub keep_workspace: bool,
}
