//! Git test helper utilities
//!
//! Provides a safe, testable wrapper around Git operations for unit tests.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git command builder for tests
///
/// Provides a safe wrapper around git commands with proper error handling
/// and test isolation. Use this instead of raw `std::process::Command` for
/// git operations in tests.
pub struct TestGit {
    repo_path: PathBuf,
}

fn run_git(dir: &Path, args: &[&str], action: &str) -> Result<std::process::Output> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .with_context(|| action.to_string())?;

    if !output.status.success() {
        bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
    }

    Ok(output)
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        run_git(&self.repo_path, args, action)
    }

    /// Create a new TestGit instance for the given repository path
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Clone `source` into `dest` and return a helper for the clone
    pub fn clone_from(source: &Path, dest: &Path) -> Result<Self> {
        let parent = dest.parent().context("Clone destination has no parent directory")?;
        let source = source.display().to_string();
        let target = dest.display().to_string();
        run_git(parent, &["clone", "--quiet", &source, &target], "Failed to clone repository")?;
        Ok(Self::new(dest))
    }

    /// Initialize a new git repository with `main` as the initial branch
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.repo_path)?;
        self.run_git_command(&["init", "--quiet"], "Failed to initialize git repository")?;
        self.set_head("main")
    }

    /// Initialize a bare git repository whose HEAD points at `main`
    pub fn init_bare(&self) -> Result<()> {
        fs::create_dir_all(&self.repo_path)?;
        self.run_git_command(
            &["init", "--bare", "--quiet"],
            "Failed to initialize bare git repository",
        )?;
        self.set_head("main")
    }

    /// Configure git user for tests
    pub fn config_user(&self) -> Result<()> {
        self.config("user.email", "test@git-autoupdate.example")?;
        self.config("user.name", "Test User")?;
        self.config("commit.gpgsign", "false")
    }

    /// Set a repository-local configuration value
    pub fn config(&self, key: &str, value: &str) -> Result<()> {
        self.run_git_command(&["config", key, value], &format!("Failed to set config {key}"))?;
        Ok(())
    }

    /// Make git fetch from `target` whenever a remote uses `url`
    ///
    /// Lets tests use an accepted `https://` update URL while the objects
    /// come from a local bare repository.
    pub fn redirect_url(&self, url: &str, target: &Path) -> Result<()> {
        self.config(&format!("url.{}.insteadOf", target.display()), url)
    }

    /// Write a file relative to the repository root
    pub fn write_file(&self, name: &str, content: &str) -> Result<()> {
        let path = self.repo_path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Add all files to staging
    pub fn add_all(&self) -> Result<()> {
        self.run_git_command(&["add", "."], "Failed to add files to git")?;
        Ok(())
    }

    /// Create a commit with the given message
    pub fn commit(&self, message: &str) -> Result<()> {
        self.run_git_command(&["commit", "--quiet", "-m", message], "Failed to create git commit")?;
        Ok(())
    }

    /// Write, stage and commit a single file, returning the new HEAD
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Result<String> {
        self.write_file(name, content)?;
        self.add_all()?;
        self.commit(message)?;
        self.rev_parse_head()
    }

    /// Add a remote repository
    pub fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        self.run_git_command(
            &["remote", "add", name, url],
            &format!("Failed to add remote: {name}"),
        )?;
        Ok(())
    }

    /// Names of the configured remotes
    pub fn remotes(&self) -> Result<Vec<String>> {
        let output = self.run_git_command(&["remote"], "Failed to list remotes")?;
        Ok(String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect())
    }

    /// Push a branch to a remote
    pub fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run_git_command(
            &["push", "--quiet", remote, branch],
            &format!("Failed to push {branch} to {remote}"),
        )?;
        Ok(())
    }

    /// Get current commit SHA
    pub fn rev_parse_head(&self) -> Result<String> {
        let output =
            self.run_git_command(&["rev-parse", "HEAD"], "Failed to get current commit SHA")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Checkout a branch or commit
    pub fn checkout(&self, ref_name: &str) -> Result<()> {
        self.run_git_command(
            &["checkout", "--quiet", ref_name],
            &format!("Failed to checkout: {ref_name}"),
        )?;
        Ok(())
    }

    /// Get the current branch name
    pub fn get_current_branch(&self) -> Result<String> {
        let output = self
            .run_git_command(&["branch", "--show-current"], "Failed to get current branch name")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Get porcelain status output
    pub fn status_porcelain(&self) -> Result<String> {
        let output =
            self.run_git_command(&["status", "--porcelain"], "Failed to get git status")?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Set HEAD to point to a branch (making it default branch)
    pub fn set_head(&self, branch_name: &str) -> Result<()> {
        self.run_git_command(
            &["symbolic-ref", "HEAD", &format!("refs/heads/{branch_name}")],
            &format!("Failed to set HEAD to branch: {branch_name}"),
        )?;
        Ok(())
    }

    /// Return the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}
