//! Configuration types and defaults for sitedeploy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file looked up in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "sitedeploy.yaml";

/// Directory copied into the workspace when no build command is configured.
pub const DEFAULT_SOURCE_DIR: &str = "public";

/// An extra file or directory copied into the workspace after the build.
///
/// `src` is relative to the project directory, `dest` to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentFile {
    pub src: PathBuf,
    pub dest: PathBuf,
}

/// How the site gets into the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildSource {
    /// Run a build command (shell-words parsed, `{target}` substituted).
    Command(String),
    /// Copy an already-built directory.
    Directory(PathBuf),
}

/// Commit message used when none is configured.
pub fn default_message_at(now: DateTime<Utc>) -> String {
    format!("Site updated: {}", now.format("%Y-%m-%d %H:%M:%S"))
}

pub(crate) fn default_message() -> String {
    default_message_at(Utc::now())
}
