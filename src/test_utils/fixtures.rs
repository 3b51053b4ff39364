//! Repository fixtures for update scenarios
//!
//! An [`UpdateFixture`] lays out the three repositories every update test
//! needs inside one temporary directory:
//!
//! - `upstream.git`, a bare repository playing the update source,
//! - `dev`, a working clone used to publish new upstream commits,
//! - `install`, the installation being updated.
//!
//! The installation reaches the bare repository through
//! [`FIXTURE_UPSTREAM_URL`], an `https://` URL that git rewrites to the local
//! path with `url.<path>.insteadOf`, so the URL validator sees a realistic
//! update source while no network access is needed.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::TestGit;
use crate::config::AutoUpdateConfig;

/// Update source URL the fixture installation is configured with.
pub const FIXTURE_UPSTREAM_URL: &str = "https://updates.example.test/app.git";

/// Update source URL that is redirected to a path that does not exist.
pub const UNREACHABLE_UPSTREAM_URL: &str = "https://unreachable.example.test/app.git";

/// Upstream, publisher and installation repositories for one test.
pub struct UpdateFixture {
    temp_dir: TempDir,
    upstream: PathBuf,
    /// Working clone that publishes to the upstream
    pub dev: TestGit,
    /// The installation under update
    pub install: TestGit,
}

impl UpdateFixture {
    /// Create the fixture with a single initial commit on upstream `main`,
    /// cloned into the installation.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let upstream = temp_dir.path().join("upstream.git");
        TestGit::new(&upstream).init_bare()?;

        let dev = TestGit::new(temp_dir.path().join("dev"));
        dev.init()?;
        dev.config_user()?;
        dev.commit_file("README.md", "# app\n", "Initial commit")?;
        dev.remote_add("origin", &upstream.display().to_string())?;
        dev.push("origin", "main")?;

        let install = TestGit::clone_from(&upstream, &temp_dir.path().join("install"))?;
        install.config_user()?;
        install.redirect_url(FIXTURE_UPSTREAM_URL, &upstream)?;
        install.redirect_url(UNREACHABLE_UPSTREAM_URL, &temp_dir.path().join("missing.git"))?;

        Ok(Self {
            temp_dir,
            upstream,
            dev,
            install,
        })
    }

    /// Commit a file in the publisher clone and push it upstream.
    ///
    /// Returns the new upstream tip.
    pub fn publish(&self, name: &str, content: &str, message: &str) -> Result<String> {
        let sha = self.dev.commit_file(name, content, message)?;
        self.dev.push("origin", "main")?;
        Ok(sha)
    }

    /// Commit a file directly in the installation.
    pub fn commit_locally(&self, name: &str, content: &str, message: &str) -> Result<String> {
        self.install.commit_file(name, content, message)
    }

    /// Path of the installation working tree.
    pub fn install_path(&self) -> &Path {
        self.install.repo_path()
    }

    /// Path of the bare upstream repository.
    pub fn upstream_path(&self) -> &Path {
        &self.upstream
    }

    /// Root of the temporary directory holding all fixture repositories.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Settings pointing at the fixture upstream.
    pub fn config(&self) -> AutoUpdateConfig {
        AutoUpdateConfig {
            upstream_url: FIXTURE_UPSTREAM_URL.to_string(),
            ..AutoUpdateConfig::default()
        }
    }
}
