//! Remove previous build output matching delete patterns.

use crate::error::{DeployError, Result};
use crate::fs::remove_path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Remove every entry under `root` whose root-relative path matches one of
/// `patterns`. The `.git` directory is never visited.
///
/// A matching directory is removed together with its contents. Returns the
/// removed paths in the order they were removed.
pub fn prune_matching(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let globs = build_globset(patterns)?;
    if globs.is_empty() || !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut matched = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| {
            DeployError::Filesystem(format!("failed to walk '{}': {}", root.display(), e))
        })?;

        if entry.depth() == 1 && entry.file_name() == ".git" {
            walker.skip_current_dir();
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        if globs.is_match(&relative) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            matched.push(entry.path().to_path_buf());
        }
    }

    for path in &matched {
        debug!(path = %path.display(), "removing file matching delete pattern");
        remove_path(path)?;
    }

    Ok(matched)
}

/// Check that every pattern is a valid glob.
pub fn check_patterns(patterns: &[String]) -> Result<()> {
    build_globset(patterns).map(|_| ())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let normalized = pattern.trim().replace('\\', "/");
        if normalized.is_empty() {
            continue;
        }
        let glob = Glob::new(&normalized).map_err(|e| {
            DeployError::Config(format!("invalid delete pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| DeployError::Config(format!("failed to build delete patterns: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn site() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join(".git/index.html"), "not a page").unwrap();
        fs::create_dir_all(root.join("blog/2024")).unwrap();
        fs::write(root.join("index.html"), "home").unwrap();
        fs::write(root.join("blog/2024/post.html"), "post").unwrap();
        fs::write(root.join("CNAME"), "example.com").unwrap();
        temp
    }

    #[test]
    fn prune_removes_matching_files() {
        let temp = site();
        let root = temp.path();

        let removed = prune_matching(root, &patterns(&["**/*.html"])).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!root.join("index.html").exists());
        assert!(!root.join("blog/2024/post.html").exists());
        assert!(root.join("CNAME").exists());
    }

    #[test]
    fn prune_never_touches_git_dir() {
        let temp = site();
        let root = temp.path();

        prune_matching(root, &patterns(&["**"])).unwrap();

        assert!(root.join(".git/index.html").exists());
        assert!(!root.join("CNAME").exists());
        assert!(!root.join("blog").exists());
    }

    #[test]
    fn prune_removes_matching_directory_once() {
        let temp = site();
        let root = temp.path();

        let removed = prune_matching(root, &patterns(&["blog"])).unwrap();

        assert_eq!(removed, vec![root.join("blog")]);
        assert!(!root.join("blog").exists());
        assert!(root.join("index.html").exists());
    }

    #[test]
    fn prune_with_no_patterns_is_noop() {
        let temp = site();
        let removed = prune_matching(temp.path(), &[]).unwrap();
        assert!(removed.is_empty());
        assert!(temp.path().join("index.html").exists());
    }

    #[test]
    fn prune_invalid_pattern_is_config_error() {
        let temp = site();
        let err = prune_matching(temp.path(), &patterns(&["[unclosed"])).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }
}
