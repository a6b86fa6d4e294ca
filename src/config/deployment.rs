//! The validated, immutable input to one deployment run.

use super::model::FileConfig;
use super::types::{BuildSource, DEFAULT_SOURCE_DIR, DeploymentFile, default_message};
use crate::builder::BuildOptions;
use crate::error::{DeployError, Result};
use crate::fs::{CopyPair, check_patterns};
use crate::gateway::Signature;
use std::path::{Component, Path, PathBuf};

/// Values given on the command line. `None` defers to the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOverrides {
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub folder: Option<PathBuf>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub debug: bool,
}

/// Everything a deployment run needs, merged from CLI flags and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub remote: String,
    pub branch: String,
    pub message: String,
    pub folder: Option<PathBuf>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub deployment_files: Vec<DeploymentFile>,
    pub exclude_links: Vec<String>,
    pub add_links: Vec<String>,
    pub delete_patterns: Vec<String>,
    /// Leave the workspace on disk after the run, whatever the outcome.
    pub keep_workspace: bool,
    /// Directory that relative sources and the build command resolve against.
    pub project_dir: PathBuf,
    /// Parent of the workspace; the system temp dir when unset.
    pub workspace_root: Option<PathBuf>,
    pub build: BuildSource,
}

impl DeploymentConfig {
    /// A config with the required fields set and everything else defaulted.
    pub fn new(
        remote: impl Into<String>,
        branch: impl Into<String>,
        message: impl Into<String>,
        project_dir: impl Into<PathBuf>,
    ) -> Self {
        let project_dir = project_dir.into();
        Self {
            remote: remote.into(),
            branch: branch.into(),
            message: message.into(),
            folder: None,
            author_name: None,
            author_email: None,
            deployment_files: Vec::new(),
            exclude_links: Vec::new(),
            add_links: Vec::new(),
            delete_patterns: Vec::new(),
            keep_workspace: false,
            build: BuildSource::Directory(project_dir.join(DEFAULT_SOURCE_DIR)),
            project_dir,
            workspace_root: None,
        }
    }

    /// Merge CLI overrides over the config file.
    ///
    /// Precedence is CLI flag, then config file, then built-in default.
    /// Empty strings count as unset. A relative local `remote` is made
    /// absolute against `project_dir`. The result still has to pass
    /// [`DeploymentConfig::validate`].
    pub fn resolve(file: FileConfig, cli: DeployOverrides, project_dir: &Path) -> Self {
        let message = pick(cli.message, file.message).unwrap_or_else(default_message);

        let build = match non_empty(file.build_command) {
            Some(command) => BuildSource::Command(command),
            None => BuildSource::Directory(
                project_dir.join(
                    file.source_dir
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
                ),
            ),
        };

        let remote = pick(cli.remote, file.remote).unwrap_or_default();

        Self {
            remote: resolve_remote(remote, project_dir),
            branch: pick(cli.branch, file.branch).unwrap_or_default(),
            message,
            folder: cli.folder.or(file.folder).filter(|f| !f.as_os_str().is_empty()),
            author_name: pick(cli.name, file.name),
            author_email: pick(cli.email, file.email),
            deployment_files: file.deployment_files,
            exclude_links: file.exclude_links,
            add_links: file.add_links,
            delete_patterns: file.delete_patterns,
            keep_workspace: cli.debug || file.keep_workspace,
            project_dir: project_dir.to_path_buf(),
            workspace_root: file.workspace_root,
            build,
        }
    }

    /// Check preconditions that must hold before any side effect.
    ///
    /// Rules:
    /// - `remote`, `branch` and `message` must be non-empty
    /// - `email` requires `name`
    /// - `folder` and deployment file destinations must stay inside the workspace
    /// - a deployment file destination must name an entry, not the workspace itself
    /// - delete patterns must be valid globs
    pub fn validate(&self) -> Result<()> {
        require(&self.remote, "remote", "--remote")?;
        require(&self.branch, "branch", "--branch")?;
        require(&self.message, "message", "--message")?;

        if self.author_email.is_some() && self.author_name.is_none() {
            return Err(DeployError::Config(
                "email requires name: set --name (or `name` in the config file) when using --email"
                    .to_string(),
            ));
        }

        if let Some(folder) = &self.folder {
            ensure_inside_workspace(folder, "folder")?;
        }
        for file in &self.deployment_files {
            ensure_inside_workspace(&file.dest, "deployment_files dest")?;
            ensure_names_entry(&file.dest, "deployment_files dest")?;
        }

        check_patterns(&self.delete_patterns)
    }

    /// The commit signature, if a name is configured.
    pub fn signature(&self) -> Option<Signature> {
        self.author_name
            .as_deref()
            .map(|name| Signature::new(name, self.author_email.as_deref()))
    }

    /// Directory inside `workspace` that receives the build.
    pub fn build_target(&self, workspace: &Path) -> PathBuf {
        match &self.folder {
            Some(folder) => workspace.join(folder),
            None => workspace.to_path_buf(),
        }
    }

    /// Options passed through to the site builder. Symlinking is always off.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            exclude_links: self.exclude_links.clone(),
            add_links: self.add_links.clone(),
            delete_patterns: self.delete_patterns.clone(),
            symlink: false,
        }
    }

    /// Deployment files with `src` resolved against the project directory
    /// and `dest` against `workspace`.
    pub fn copy_pairs(&self, workspace: &Path) -> Vec<CopyPair> {
        self.deployment_files
            .iter()
            .map(|file| CopyPair {
                src: self.project_dir.join(&file.src),
                dest: workspace.join(&file.dest),
            })
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn pick(cli: Option<String>, file: Option<String>) -> Option<String> {
    non_empty(cli).or_else(|| non_empty(file))
}

fn require(value: &str, key: &str, flag: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::Config(format!(
            "{} is required. Use {} or set `{}` in the config file",
            key, flag, key
        )));
    }
    Ok(())
}

/// Local paths are cloned from outside the project directory, so a relative
/// one is anchored to it. URLs and scp-style `host:path` remotes pass through.
fn resolve_remote(remote: String, project_dir: &Path) -> String {
    if remote.is_empty() || Path::new(&remote).is_absolute() || is_url(&remote) {
        return remote;
    }
    project_dir.join(&remote).to_string_lossy().into_owned()
}

fn is_url(remote: &str) -> bool {
    if remote.contains("://") {
        return true;
    }
    // scp-style syntax has a colon before the first slash.
    match remote.find(':') {
        Some(colon) => remote.find('/').is_none_or(|slash| colon < slash),
        None => false,
    }
}

fn ensure_names_entry(path: &Path, key: &str) -> Result<()> {
    if !path.components().any(|c| matches!(c, Component::Normal(_))) {
        return Err(DeployError::Config(format!(
            "{} '{}' must name a file or directory inside the repository",
            key,
            path.display()
        )));
    }
    Ok(())
}

fn ensure_inside_workspace(path: &Path, key: &str) -> Result<()> {
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(DeployError::Config(format!(
            "{} '{}' must be a relative path inside the repository",
            key,
            path.display()
        )));
    }
    Ok(())
}
