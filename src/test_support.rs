use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Switches the process working directory until dropped.
pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The working directory is process-global.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) const TEST_NAME: &str = "Test User";
pub(crate) const TEST_EMAIL: &str = "test@example.com";

/// A working repository on `main` with one commit.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    temp_dir
}

/// A bare repository to push deployments into.
///
/// With `seed_branch` set, the branch is created on the remote with a single
/// `index.html` so it exists before the first deploy.
pub(crate) fn create_bare_remote(seed_branch: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let remote = temp_dir.path();
    git(remote, &["init", "--bare"]);
    git(remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    if let Some(branch) = seed_branch {
        let seed = create_test_repo();
        let path = seed.path();
        git(path, &["checkout", "-b", branch]);
        std::fs::write(path.join("index.html"), "<h1>old</h1>\n").unwrap();
        git(path, &["add", "."]);
        git(path, &["commit", "-m", "Seed"]);
        let remote_str = remote.to_string_lossy().to_string();
        git(path, &["push", &remote_str, branch]);
    }

    temp_dir
}

/// Read a file from `branch` of a (possibly bare) repository.
pub(crate) fn show_file(repo: &Path, branch: &str, file: &str) -> Option<String> {
    let output = Command::new("git")
        .current_dir(repo)
        .args(["show", &format!("{}:{}", branch, file)])
        .output()
        .unwrap();
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        None
    }
}

/// Output of `git log -1 --format=<format> <branch>` in `repo`.
pub(crate) fn last_commit(repo: &Path, branch: &str, format: &str) -> String {
    let output = Command::new("git")
        .current_dir(repo)
        .args(["log", "-1", &format!("--format={}", format), branch])
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(path: &Path) {
    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", TEST_EMAIL]);
    git(path, &["config", "user.name", TEST_NAME]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
}

pub(crate) fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}
