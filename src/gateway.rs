//! Version-control gateway.
//!
//! The pipeline talks to version control only through [`VersionControl`].
//! [`GitGateway`] is the production implementation and shells out to `git`
//! via [`crate::git::run_git`]; tests substitute recording fakes.
//!
//! Each operation maps to exactly one git invocation. Nothing is retried:
//! network hiccups surface as ordinary `DeployError::VersionControl` errors
//! carrying git's diagnostic output.

use crate::error::Result;
use crate::git::run_git;
use std::fmt;
use std::path::Path;

/// Name/email pair attached to a deployment commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    /// Build a signature; a missing email becomes the empty string.
    pub fn new(name: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            name: name.into(),
            email: email.unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Version-control operations used by a deployment run.
pub trait VersionControl {
    /// Clone `remote` into the (empty) `destination` directory.
    fn clone_repo(&self, remote: &str, destination: &Path) -> Result<()>;

    /// Switch to an existing branch. Fails when the branch does not exist.
    fn checkout(&self, work_dir: &Path, branch: &str) -> Result<()>;

    /// Create `branch` and switch to it.
    fn checkout_new_branch(&self, work_dir: &Path, branch: &str) -> Result<()>;

    /// Stage every change in the working tree, including deletions.
    fn stage_all(&self, work_dir: &Path) -> Result<()>;

    /// Commit the staged changes.
    fn commit(&self, work_dir: &Path, message: &str, signature: Option<&Signature>) -> Result<()>;

    /// Push `branch` to the remote the working copy was cloned from.
    fn push(&self, work_dir: &Path, branch: &str) -> Result<()>;
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitGateway;

impl VersionControl for GitGateway {
    fn clone_repo(&self, remote: &str, destination: &Path) -> Result<()> {
        let dest = destination.to_string_lossy();
        run_git(destination, &["clone", remote, &dest])?;
        Ok(())
    }

    fn checkout(&self, work_dir: &Path, branch: &str) -> Result<()> {
        run_git(work_dir, &["checkout", branch])?;
        Ok(())
    }

    fn checkout_new_branch(&self, work_dir: &Path, branch: &str) -> Result<()> {
        run_git(work_dir, &["checkout", "-b", branch])?;
        Ok(())
    }

    fn stage_all(&self, work_dir: &Path) -> Result<()> {
        run_git(work_dir, &["add", "-A", "."])?;
        Ok(())
    }

    fn commit(&self, work_dir: &Path, message: &str, signature: Option<&Signature>) -> Result<()> {
        match signature {
            // The signature is used for both author and committer.
            Some(sig) => {
                let name = format!("user.name={}", sig.name);
                let email = format!("user.email={}", sig.email);
                let author = sig.to_string();
                run_git(
                    work_dir,
                    &[
                        "-c", &name, "-c", &email, "commit", "-m", message, "--author", &author,
                    ],
                )?;
            }
            None => {
                run_git(work_dir, &["commit", "-m", message])?;
            }
        }
        Ok(())
    }

    fn push(&self, work_dir: &Path, branch: &str) -> Result<()> {
        run_git(work_dir, &["push", "origin", branch])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;
    use crate::test_support::{TEST_EMAIL, TEST_NAME, create_bare_remote, git, last_commit};
    use tempfile::TempDir;

    fn clone_of(remote: &TempDir) -> TempDir {
        let work = TempDir::new().unwrap();
        GitGateway
            .clone_repo(&remote.path().to_string_lossy(), work.path())
            .unwrap();
        work
    }

    fn signature() -> Signature {
        Signature::new(TEST_NAME, Some(TEST_EMAIL))
    }

    #[test]
    fn signature_display() {
        assert_eq!(signature().to_string(), "Test User <test@example.com>");
    }

    #[test]
    fn signature_without_email_has_empty_brackets() {
        assert_eq!(Signature::new("Bot", None).to_string(), "Bot <>");
    }

    #[test]
    fn test_clone_into_empty_directory() {
        let remote = create_bare_remote(Some("gh-pages"));
        let work = clone_of(&remote);
        assert!(work.path().join(".git").is_dir());
    }

    #[test]
    fn test_clone_missing_remote_fails() {
        let work = TempDir::new().unwrap();
        let missing = work.path().join("no-such-remote.git");
        let err = GitGateway
            .clone_repo(&missing.to_string_lossy(), work.path())
            .unwrap_err();
        assert!(matches!(err, DeployError::VersionControl(_)));
    }

    #[test]
    fn test_checkout_existing_remote_branch() {
        let remote = create_bare_remote(Some("gh-pages"));
        let work = clone_of(&remote);
        GitGateway.checkout(work.path(), "gh-pages").unwrap();
        assert!(work.path().join("index.html").exists());
    }

    #[test]
    fn test_checkout_absent_branch_fails() {
        let remote = create_bare_remote(None);
        let work = clone_of(&remote);
        let err = GitGateway.checkout(work.path(), "gh-pages").unwrap_err();
        assert!(matches!(err, DeployError::VersionControl(_)));
    }

    #[test]
    fn test_checkout_new_branch_in_empty_clone() {
        let remote = create_bare_remote(None);
        let work = clone_of(&remote);
        GitGateway
            .checkout_new_branch(work.path(), "gh-pages")
            .unwrap();
        let head = std::fs::read_to_string(work.path().join(".git/HEAD")).unwrap();
        assert_eq!(head.trim(), "ref: refs/heads/gh-pages");
    }

    #[test]
    fn test_stage_commit_and_push() {
        let remote = create_bare_remote(None);
        let work = clone_of(&remote);
        let path = work.path();
        GitGateway.checkout_new_branch(path, "gh-pages").unwrap();
        std::fs::write(path.join("index.html"), "<h1>new</h1>\n").unwrap();

        GitGateway.stage_all(path).unwrap();
        GitGateway
            .commit(path, "deploy", Some(&signature()))
            .unwrap();
        GitGateway.push(path, "gh-pages").unwrap();

        assert_eq!(last_commit(remote.path(), "gh-pages", "%s"), "deploy");
        assert_eq!(
            last_commit(remote.path(), "gh-pages", "%an <%ae>"),
            "Test User <test@example.com>"
        );
    }

    #[test]
    fn test_commit_with_nothing_staged_fails_with_diagnostic() {
        let remote = create_bare_remote(Some("gh-pages"));
        let work = clone_of(&remote);
        GitGateway.checkout(work.path(), "gh-pages").unwrap();

        let err = GitGateway
            .commit(work.path(), "deploy", Some(&signature()))
            .unwrap_err();
        assert!(err.to_string().contains("nothing to commit"));
    }

    #[test]
    fn test_push_rejected_when_remote_moved_on() {
        let remote = create_bare_remote(Some("gh-pages"));
        let work = clone_of(&remote);
        let path = work.path();
        GitGateway.checkout(path, "gh-pages").unwrap();

        // Another clone pushes first, so ours is no longer a fast-forward.
        let other = clone_of(&remote);
        GitGateway.checkout(other.path(), "gh-pages").unwrap();
        std::fs::write(other.path().join("other.html"), "other").unwrap();
        git(other.path(), &["add", "."]);
        GitGateway
            .commit(other.path(), "other", Some(&signature()))
            .unwrap();
        GitGateway.push(other.path(), "gh-pages").unwrap();

        std::fs::write(path.join("mine.html"), "mine").unwrap();
        GitGateway.stage_all(path).unwrap();
        GitGateway.commit(path, "mine", Some(&signature())).unwrap();
        let err = GitGateway.push(path, "gh-pages").unwrap_err();

        assert!(matches!(err, DeployError::VersionControl(_)));
        assert!(err.to_string().starts_with("git push failed"));
    }
}
