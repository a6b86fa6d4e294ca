//! Command implementations for sitedeploy.

mod deploy;

use crate::cli::{Cli, Command};
use crate::error::Result;

/// Dispatch the parsed command line to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Deploy(args) => deploy::cmd_deploy(cli.config.as_deref(), args),
    }
}
