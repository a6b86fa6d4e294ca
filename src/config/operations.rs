//! Config file loading.

use super::model::FileConfig;
use super::types::DEFAULT_CONFIG_FILE;
use crate::error::{DeployError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

impl FileConfig {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DeployError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), "loaded config file");
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string. An empty document is the default.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| DeployError::Config(format!("failed to parse config YAML: {}", e)))
    }

    /// Locate and load the config file.
    ///
    /// An explicit path must exist. Without one, `sitedeploy.yaml` in
    /// `project_dir` is used when present and defaults apply otherwise.
    pub fn discover(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path: PathBuf = project_dir.join(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
