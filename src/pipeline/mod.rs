//! The deployment pipeline.
//!
//! A run is a strictly ordered chain of fallible steps sharing one temporary
//! workspace:
//!
//! 1. validate the config (no side effects before this passes)
//! 2. create the workspace
//! 3. clone the remote, check out the target branch (creating it if absent)
//! 4. build the site into the workspace (or `folder` inside it)
//! 5. copy extra deployment files
//! 6. clear the git index, stage everything, commit
//! 7. push the branch
//! 8. remove the workspace unless it is kept
//!
//! The first failing step ends the run. The workspace is cleaned up the same
//! way on success and failure; only `keep_workspace` suppresses it.

use crate::builder::SiteBuilder;
use crate::config::DeploymentConfig;
use crate::error::{DeployError, Result};
use crate::fs::{remove_path, sync_files};
use crate::gateway::VersionControl;
use crate::workspace::Workspace;
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info};


/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Staging,
    BuildingAndCopying,
    Committing,
    Pushing,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Staging => "staging",
            Stage::BuildingAndCopying => "building",
            Stage::Committing => "committing",
            Stage::Pushing => "pushing",
            Stage::CleaningUp => "cleaning up",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs deployments with a given version-control gateway and site builder.
#[derive(Debug)]
pub struct Deployer<G, B> {
    gateway: G,
    builder: B,
}

impl<G: VersionControl, B: SiteBuilder> Deployer<G, B> {
    pub fn new(gateway: G, builder: B) -> Self {
        Self { gateway, builder }
    }

    #[cfg(test)]
    pub(crate) fn gateway(&self) -> &G {
        &self.gateway
    }

    #[cfg(test)]
    pub(crate) fn builder(&self) -> &B {
        &self.builder
    }

    /// Deploy the site described by `config`.
    ///
    /// Errors from any step are returned unchanged, after the workspace has
    /// been removed (unless `keep_workspace` is set).
    pub fn deploy(&self, config: &DeploymentConfig) -> Result<()> {
        let mut stage = Stage::Validating;
        debug!(%stage, "validating configuration");
        config.validate()?;

        let workspace = match &config.workspace_root {
            Some(root) => Workspace::create_in(root)?,
            None => Workspace::create()?,
        };

        let outcome = self.run_steps(config, workspace.path(), &mut stage);

        match outcome {
            Ok(()) => {
                stage = Stage::CleaningUp;
                debug!(%stage, "deployment pushed");
                workspace.finish(config.keep_workspace);
                stage = Stage::Done;
                info!(%stage, "Deployed branch {} to {}", config.branch, config.remote);
                Ok(())
            }
            Err(err) => {
                error!(%stage, "Deployment failed: {}", err);
                stage = Stage::Failed;
                debug!(%stage, "cleaning up after failure");
                workspace.finish(config.keep_workspace);
                Err(err)
            }
        }
    }

    fn run_steps(&self, config: &DeploymentConfig, dir: &Path, stage: &mut Stage) -> Result<()> {
        *stage = Stage::Staging;
        info!("Cloning {}", config.remote);
        self.gateway.clone_repo(&config.remote, dir)?;

        info!("Checking out branch {}", config.branch);
        self.checkout_or_create(dir, &config.branch)?;

        *stage = Stage::BuildingAndCopying;
        let target = config.build_target(dir);
        info!("Building site into {}", target.display());
        std::fs::create_dir_all(&target).map_err(|e| {
            DeployError::Filesystem(format!(
                "failed to create build directory '{}': {}",
                target.display(),
                e
            ))
        })?;
        self.builder.build(&target, &config.build_options())?;

        if !config.deployment_files.is_empty() {
            info!("Copying {} deployment file(s)", config.deployment_files.len());
            sync_files(&config.copy_pairs(dir))?;
        }

        *stage = Stage::Committing;
        debug!("clearing git index");
        clear_index(dir)?;

        info!("Staging changes");
        self.gateway.stage_all(dir)?;

        info!("Committing: {}", config.message);
        let signature = config.signature();
        self.gateway.commit(dir, &config.message, signature.as_ref())?;

        *stage = Stage::Pushing;
        info!("Pushing branch {} to {}", config.branch, config.remote);
        self.gateway.push(dir, &config.branch)?;

        Ok(())
    }

    /// Check out `branch`, creating it when checkout fails.
    ///
    /// Any checkout failure is taken to mean the branch does not exist yet.
    /// A failure to create it is fatal.
    fn checkout_or_create(&self, dir: &Path, branch: &str) -> Result<()> {
        match self.gateway.checkout(dir, branch) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("checkout of '{}' failed: {}", branch, err);
                info!("Branch {} does not exist, creating it", branch);
                self.gateway.checkout_new_branch(dir, branch)
            }
        }
    }
}

/// Remove the git index so the next `add` restages the whole tree and files
/// the build no longer produces show up as deletions.
fn clear_index(dir: &Path) -> Result<()> {
    remove_path(&dir.join(".git").join("index"))
}
