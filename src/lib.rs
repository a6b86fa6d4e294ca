//! sitedeploy: deploy a built static site to a branch of a remote git
//! repository.
//!
//! A run clones the remote into a fresh temporary workspace, checks out (or
//! creates) the target branch, builds the site into it, copies any extra
//! deployment files, commits and pushes. See [`pipeline::Deployer`].

pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod gateway;
pub mod git;
pub mod logging;
pub mod pipeline;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;
