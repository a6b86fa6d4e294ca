//! Filesystem utilities for sitedeploy.
//!
//! Copying deployment files into the workspace and pruning build output.

pub mod prune;
pub mod sync;

pub use prune::{check_patterns, prune_matching};
pub use sync::{CopyPair, remove_path, replace_path, sync_files};
