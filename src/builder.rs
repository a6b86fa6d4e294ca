//! Site builders.
//!
//! The pipeline treats the builder as an opaque capability: given a target
//! directory inside the workspace and the pass-through [`BuildOptions`], it
//! leaves the built site in that directory.
//!
//! Two implementations ship with the CLI:
//! - [`CommandBuilder`] runs a user-supplied build command.
//! - [`CopyBuilder`] copies an already-built directory (e.g. `public/`).
//!
//! Both first prune files in the target that match `delete_patterns`, so
//! output that the new build no longer produces disappears from the branch.

use crate::error::{DeployError, Result};
use crate::fs::{prune_matching, replace_path};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Maximum number of output lines kept in a build failure message.
const BUILD_ERROR_MAX_LINES: usize = 50;

/// Maximum total characters kept in a build failure message.
const BUILD_ERROR_MAX_CHARS: usize = 4096;

/// Placeholder substituted with the target directory in build command args.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Options handed through to the builder untouched by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub exclude_links: Vec<String>,
    pub add_links: Vec<String>,
    pub delete_patterns: Vec<String>,
    /// Whether the builder may symlink files instead of copying them.
    pub symlink: bool,
}

/// Produces build artifacts into a target directory.
pub trait SiteBuilder {
    fn build(&self, target: &Path, options: &BuildOptions) -> Result<()>;
}

impl<B: SiteBuilder + ?Sized> SiteBuilder for Box<B> {
    fn build(&self, target: &Path, options: &BuildOptions) -> Result<()> {
        (**self).build(target, options)
    }
}

/// Runs an external build command.
///
/// The command is split with shell-words (no shell is involved) and run in
/// the project directory. `{target}` in any argument is replaced by the
/// target path, which is also exported as `SITEDEPLOY_TARGET`.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command: String,
    project_dir: PathBuf,
}

impl CommandBuilder {
    pub fn new(command: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            project_dir: project_dir.into(),
        }
    }

    fn argv(&self, target: &Path) -> Result<Vec<String>> {
        let command = self.command.trim();
        let args = shell_words::split(command).map_err(|e| {
            DeployError::Build(format!(
                "failed to parse build_command '{}': {}\n\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command, e
            ))
        })?;

        if args.is_empty() {
            return Err(DeployError::Build(
                "build_command is empty after parsing.".to_string(),
            ));
        }

        let target = target.to_string_lossy();
        Ok(args
            .into_iter()
            .map(|arg| arg.replace(TARGET_PLACEHOLDER, &target))
            .collect())
    }
}

impl SiteBuilder for CommandBuilder {
    fn build(&self, target: &Path, options: &BuildOptions) -> Result<()> {
        prune_matching(target, &options.delete_patterns)?;

        let args = self.argv(target)?;
        let program = &args[0];
        info!("Running build command: {}", self.command.trim());

        let output = Command::new(program)
            .args(&args[1..])
            .current_dir(&self.project_dir)
            .env("SITEDEPLOY_TARGET", target)
            .env("SITEDEPLOY_EXCLUDE_LINKS", options.exclude_links.join("\n"))
            .env("SITEDEPLOY_ADD_LINKS", options.add_links.join("\n"))
            .env("SITEDEPLOY_SYMLINK", if options.symlink { "1" } else { "0" })
            .output()
            .map_err(|e| {
                DeployError::Build(format!(
                    "failed to execute '{}': {}\n\n\
                     Fix: ensure the command is installed and in PATH.",
                    program, e
                ))
            })?;

        if output.status.success() {
            debug!("build command finished");
            return Ok(());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = if stderr.is_empty() {
            stdout.to_string()
        } else {
            format!("{}\n{}", stdout, stderr)
        };

        let mut msg = format!(
            "command exited with code {}\nCommand: {}",
            output.status.code().unwrap_or(-1),
            self.command.trim()
        );
        let truncated = truncate_output(combined.trim(), BUILD_ERROR_MAX_LINES, BUILD_ERROR_MAX_CHARS);
        if !truncated.is_empty() {
            msg.push_str("\n\nOutput:\n");
            msg.push_str(&truncated);
        }
        Err(DeployError::Build(msg))
    }
}

/// Copies a prebuilt site directory into the target.
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    source_dir: PathBuf,
}

impl CopyBuilder {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }
}

impl SiteBuilder for CopyBuilder {
    fn build(&self, target: &Path, options: &BuildOptions) -> Result<()> {
        prune_matching(target, &options.delete_patterns)?;

        if !self.source_dir.is_dir() {
            return Err(DeployError::Build(format!(
                "site directory '{}' does not exist. Build the site first or set build_command.",
                self.source_dir.display()
            )));
        }

        info!("Copying {} into workspace", self.source_dir.display());
        let entries = std::fs::read_dir(&self.source_dir).map_err(|e| {
            DeployError::Build(format!(
                "failed to read '{}': {}",
                self.source_dir.display(),
                e
            ))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| DeployError::Build(format!("failed to read directory entry: {}", e)))?;
            replace_path(&entry.path(), &target.join(entry.file_name()))?;
        }
        Ok(())
    }
}

fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    let relevant_lines: Vec<&str> = if lines.len() > max_lines {
        lines[lines.len() - max_lines..].to_vec()
    } else {
        lines
    };

    let mut result = relevant_lines.join("\n");

    if result.len() > max_chars {
        let mut start = result.len() - max_chars;
        while !result.is_char_boundary(start) {
            start += 1;
        }
        result = format!("...(truncated)...\n{}", &result[start..]);
    }

    result
}
