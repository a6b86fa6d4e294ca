//! Configuration for sitedeploy.
//!
//! Two layers feed a run: the optional `sitedeploy.yaml` ([`FileConfig`]) and
//! CLI flags ([`DeployOverrides`]). [`DeploymentConfig::resolve`] merges them
//! into one immutable value before the pipeline starts.

mod deployment;
mod model;
mod operations;
pub mod types;


pub use deployment::{DeployOverrides, DeploymentConfig};
pub use model::FileConfig;
pub use types::{BuildSource, DEFAULT_CONFIG_FILE, DeploymentFile, default_message_at};
