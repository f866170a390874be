//! Throwaway git repositories that a hook is installed into and checked out in.
//!
//! Every fixture has the same shape:
//!
//! - the default branch with `requirements.txt` and `README.md` in one commit,
//! - [`FEATURE_BRANCH`] on top of it, adding `dev-requirements.txt` in a second commit,
//!
//! and is left checked out on the feature branch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hookprobe_consts::{DEFAULT_BRANCH, FEATURE_BRANCH};
use tempfile::TempDir;
use tracing::{debug, error, trace};

use crate::git;

const BASE_FILES: [(&str, &str); 2] = [
    ("requirements.txt", "requests==2.28.0\npytest==7.0.0\n"),
    ("README.md", "# Test Repository\n"),
];
const FEATURE_FILE: (&str, &str) = ("dev-requirements.txt", "black==22.0.0\nflake8==4.0.0\n");

const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";
const FEATURE_COMMIT_MESSAGE: &str = "Add dev requirements";

/// A git repository in a temporary directory.
///
/// The directory is removed when the fixture is dropped. Use [`Fixture::close`] (or
/// [`with_fixture`]) to observe removal errors.
#[derive(Debug)]
pub(crate) struct Fixture {
    dir: TempDir,
    default_branch: String,
}

impl Fixture {
    /// Create a fresh fixture in the system temp directory.
    pub(crate) async fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir(), &[]).await
    }

    /// Create a fixture under `parent`, applying `extra_config` after the standard
    /// repository config.
    ///
    /// If any setup step fails, the directory is removed before the error is returned.
    async fn create_in(parent: &Path, extra_config: &[(&str, &str)]) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("hookprobe-")
            .tempdir_in(parent)
            .context("Failed to create fixture directory")?;
        debug!(path = %dir.path().display(), "Creating fixture");

        let default_branch = build(dir.path(), extra_config)
            .await
            .with_context(|| format!("Failed to set up fixture at `{}`", dir.path().display()))?;

        Ok(Self {
            dir,
            default_branch,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The git hooks directory of the fixture.
    pub(crate) fn hooks_dir(&self) -> PathBuf {
        self.path().join(".git").join("hooks")
    }

    /// The branch the initial commit was made on.
    pub(crate) fn default_branch(&self) -> &str {
        &self.default_branch
    }

    #[allow(clippy::unused_self)]
    pub(crate) fn feature_branch(&self) -> &str {
        FEATURE_BRANCH
    }

    #[cfg(test)]
    pub(crate) async fn tracked_files(&self, rev: &str) -> Result<Vec<String>, git::Error> {
        git::tracked_files(self.path(), rev).await
    }

    #[cfg(test)]
    pub(crate) async fn commit_count(&self, rev: &str) -> Result<usize> {
        git::commit_count(self.path(), rev).await
    }

    /// Remove the fixture directory.
    pub(crate) fn close(self) -> std::io::Result<()> {
        let path = self.path().to_path_buf();
        self.dir.close()?;
        trace!(path = %path.display(), "Removed fixture");
        Ok(())
    }
}

/// Initialize the repository at `root` and return the name of its default branch.
async fn build(root: &Path, extra_config: &[(&str, &str)]) -> Result<String> {
    git::init_repository(root, DEFAULT_BRANCH).await?;

    // Keep commits independent of whoever runs us. None of these are required.
    let hooks_path = root.join(".git").join("hooks");
    let hooks_path = hooks_path.to_string_lossy();
    let config = [
        ("user.email", "test@example.com"),
        ("user.name", "Test User"),
        ("commit.gpgsign", "false"),
        ("core.hooksPath", &*hooks_path),
    ];
    for &(key, value) in config.iter().chain(extra_config) {
        git::set_local_config(root, key, value).await?;
    }

    for (name, content) in BASE_FILES {
        fs_err::tokio::write(root.join(name), content).await?;
    }
    git::add(root, ".").await?;
    git::commit(root, INITIAL_COMMIT_MESSAGE).await?;

    let default_branch = git::current_branch(root).await?;

    git::create_branch(root, FEATURE_BRANCH).await?;
    let (name, content) = FEATURE_FILE;
    fs_err::tokio::write(root.join(name), content).await?;
    git::add(root, name).await?;
    git::commit(root, FEATURE_COMMIT_MESSAGE).await?;

    Ok(default_branch)
}

/// Run `body` against a fresh fixture, removing the fixture afterwards whatever the
/// outcome.
///
/// An error from `body` takes precedence over an error removing the directory.
pub(crate) async fn with_fixture<T>(body: impl AsyncFnOnce(&Fixture) -> Result<T>) -> Result<T> {
    let fixture = Fixture::create().await?;
    let path = fixture.path().to_path_buf();

    let result = body(&fixture).await;

    match (result, fixture.close()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => {
            Err(err).with_context(|| format!("Failed to remove fixture `{}`", path.display()))
        }
        (Err(err), close) => {
            if let Err(close_err) = close {
                error!(
                    path = %path.display(),
                    "Failed to remove fixture: {close_err}"
                );
            }
            Err(err)
        }
    }
}
