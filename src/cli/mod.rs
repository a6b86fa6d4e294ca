//! CLI argument parsing for sitedeploy.
//!
//! Uses clap derive macros for declarative argument definitions. The actual
//! work happens in the `commands` module.

use crate::config::DeployOverrides;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// sitedeploy: deploy a built static site to a branch of a git repository.
///
/// The remote is cloned into a temporary directory, the site is built into
/// it, and the result is committed and pushed.
#[derive(Parser, Debug)]
#[command(name = "sitedeploy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./sitedeploy.yaml when present).
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the site and push it to the target branch.
    ///
    /// `--remote` and `--branch` are required unless set in the config file.
    Deploy(DeployArgs),
}

/// Arguments for the `deploy` command.
#[derive(Parser, Debug, Default)]
pub struct DeployArgs {
    /// Repository URL to deploy to.
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Branch that receives the site.
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Commit message (default: "Site updated: <timestamp>").
    #[arg(short, long)]
    pub message: Option<String>,

    /// Subdirectory of the branch to build into.
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Commit author name.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Commit author email (requires --name).
    #[arg(short, long)]
    pub email: Option<String>,

    /// Keep the temporary workspace for inspection.
    #[arg(long)]
    pub debug: bool,
}

impl DeployArgs {
    pub fn into_overrides(self) -> DeployOverrides {
        DeployOverrides {
            remote: self.remote,
            branch: self.branch,
            message: self.message,
            folder: self.folder,
            name: self.name,
            email: self.email,
            debug: self.debug,
        }
    }
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
