//! Error types for sitedeploy.
//!
//! Uses thiserror for derive macros. Every variant carries the underlying
//! diagnostic verbatim so the caller can present it as-is.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for deployment runs.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A required option is missing or options are combined invalidly.
    #[error("{0}")]
    Config(String),

    /// The temporary workspace could not be created.
    #[error("failed to create workspace: {0}")]
    Workspace(String),

    /// A git operation failed.
    #[error("{0}")]
    VersionControl(String),

    /// The site builder failed.
    #[error("build failed: {0}")]
    Build(String),

    /// Copying or removing files failed.
    #[error("{0}")]
    Filesystem(String),
}

impl DeployError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::Config(_) => exit_codes::CONFIG_ERROR,
            DeployError::Workspace(_) => exit_codes::WORKSPACE_FAILURE,
            DeployError::VersionControl(_) => exit_codes::GIT_FAILURE,
            DeployError::Build(_) => exit_codes::BUILD_FAILURE,
            DeployError::Filesystem(_) => exit_codes::FILESYSTEM_FAILURE,
        }
    }
}

/// Result type alias for deployment operations.
pub type Result<T> = std::result::Result<T, DeployError>;
