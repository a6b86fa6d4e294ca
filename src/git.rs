//! Git command runner for sitedeploy.
//!
//! Provides a wrapper around git commands with captured stdout/stderr and
//! structured error handling. Every git invocation made by the gateway goes
//! through this module.

use crate::error::{DeployError, Result};
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// The diagnostic git printed: stderr, or stdout when stderr is empty.
    ///
    /// `git commit` reports "nothing to commit" on stdout, so stderr alone
    /// is not enough.
    pub fn diagnostic(&self) -> &str {
        if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(DeployError::VersionControl)` - On spawn failure or non-zero exit,
///   carrying git's raw output
///
/// # Examples
///
/// ```no_run
/// use sitedeploy::git::run_git;
/// use std::path::Path;
///
/// let output = run_git(Path::new("."), &["status", "--porcelain"])?;
/// println!("Changes: {}", output.stdout);
/// # Ok::<(), sitedeploy::error::DeployError>(())
/// ```
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    debug!(cwd = %cwd.display(), "git {}", args.join(" "));

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            DeployError::VersionControl(format!(
                "failed to execute git {}: {} (is git installed?)",
                subcommand(args),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        Err(DeployError::VersionControl(format!(
            "git {} failed (exit code {}): {}",
            subcommand(args),
            exit_code,
            git_output.diagnostic()
        )))
    }
}

/// The git subcommand in `args`, skipping leading `-c key=value` overrides.
fn subcommand<'a>(args: &[&'a str]) -> &'a str {
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        if arg == "-c" {
            iter.next();
        } else {
            return arg;
        }
    }
    ""
}
