//! `sitedeploy deploy`.

use crate::builder::{CommandBuilder, CopyBuilder, SiteBuilder};
use crate::cli::DeployArgs;
use crate::config::{BuildSource, DeploymentConfig, FileConfig};
use crate::error::{DeployError, Result};
use crate::gateway::GitGateway;
use crate::pipeline::Deployer;
use std::path::Path;

pub fn cmd_deploy(config_path: Option<&Path>, args: DeployArgs) -> Result<()> {
    let project_dir = std::env::current_dir().map_err(|e| {
        DeployError::Config(format!("failed to determine current directory: {}", e))
    })?;
    deploy_in(&project_dir, config_path, args)
}

/// Merge config sources for `project_dir` and run the deployment.
fn deploy_in(project_dir: &Path, config_path: Option<&Path>, args: DeployArgs) -> Result<()> {
    let file = FileConfig::discover(config_path, project_dir)?;
    let config = DeploymentConfig::resolve(file, args.into_overrides(), project_dir);

    let builder: Box<dyn SiteBuilder> = match &config.build {
        BuildSource::Command(command) => Box::new(CommandBuilder::new(command, project_dir)),
        BuildSource::Directory(dir) => Box::new(CopyBuilder::new(dir)),
    };

    Deployer::new(GitGateway, builder).deploy(&config)?;

    println!("Deployed {} to {}", config.branch, config.remote);
    Ok(())
}
