use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::LazyLock;

use hookprobe_consts::env_vars::EnvVars;
use tracing::{instrument, warn};

use crate::process;
use crate::process::Cmd;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Command(#[from] process::Error),

    #[error("Failed to find git: {0}")]
    GitNotFound(#[from] which::Error),
}

/// Path to the `git` executable, resolved via `PATH`.
pub(crate) static GIT: LazyLock<Result<PathBuf, which::Error>> =
    LazyLock::new(|| which::which("git"));

/// Create a new `Cmd` for running git.
///
/// Variables that bind git to a particular repository are removed, every caller
/// passes the repository explicitly through `current_dir`.
pub(crate) fn git_cmd(summary: &str) -> Result<Cmd, Error> {
    let mut cmd = Cmd::new(GIT.as_ref().map_err(|&e| Error::GitNotFound(e))?, summary);
    for name in EnvVars::GIT_REPO_SCOPED {
        cmd.env_remove(name);
    }
    Ok(cmd)
}

#[instrument(level = "trace")]
pub(crate) async fn init_repository(path: &Path, initial_branch: &str) -> Result<(), Error> {
    git_cmd("git init")?
        .arg("-c")
        .arg(format!("init.defaultBranch={initial_branch}"))
        .arg("init")
        .current_dir(path)
        .output()
        .await?;
    Ok(())
}

/// Set a repository-local config value.
///
/// Returns whether git accepted it; a rejected value is logged and otherwise ignored.
#[instrument(level = "trace")]
pub(crate) async fn set_local_config(path: &Path, key: &str, value: &str) -> Result<bool, Error> {
    let output = git_cmd("git config")?
        .arg("config")
        .arg("--local")
        .arg(key)
        .arg(value)
        .current_dir(path)
        .check(false)
        .output()
        .await?;
    if !output.status.success() {
        warn!(
            key,
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "Failed to set git config",
        );
    }
    Ok(output.status.success())
}

#[instrument(level = "trace")]
pub(crate) async fn add(path: &Path, pathspec: &str) -> Result<(), Error> {
    git_cmd("git add")?
        .arg("add")
        .arg("--")
        .arg(pathspec)
        .current_dir(path)
        .output()
        .await?;
    Ok(())
}

#[instrument(level = "trace")]
pub(crate) async fn commit(path: &Path, message: &str) -> Result<(), Error> {
    git_cmd("git commit")?
        .arg("commit")
        .arg("--no-edit")
        .arg("-m")
        .arg(message)
        .current_dir(path)
        .output()
        .await?;
    Ok(())
}

/// Create `branch` from `HEAD` and switch to it.
#[instrument(level = "trace")]
pub(crate) async fn create_branch(path: &Path, branch: &str) -> Result<(), Error> {
    git_cmd("git checkout -b")?
        .arg("checkout")
        .arg("-b")
        .arg(branch)
        .current_dir(path)
        .output()
        .await?;
    Ok(())
}

/// The short name of the branch `HEAD` points to.
#[instrument(level = "trace")]
pub(crate) async fn current_branch(path: &Path) -> Result<String, Error> {
    let output = git_cmd("get current branch")?
        .arg("symbolic-ref")
        .arg("--short")
        .arg("HEAD")
        .current_dir(path)
        .output()
        .await?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Switch to `branch`, returning whatever git produced.
///
/// A non-zero exit is not an error here, only a failure to launch git is.
#[instrument(level = "trace")]
pub(crate) async fn checkout(path: &Path, branch: &str) -> Result<Output, Error> {
    let output = git_cmd("git checkout")?
        .arg("checkout")
        .arg(branch)
        .current_dir(path)
        .check(false)
        .output()
        .await?;
    Ok(output)
}

/// Files tracked at `rev`, as paths relative to the repository root.
#[cfg(test)]
pub(crate) async fn tracked_files(path: &Path, rev: &str) -> Result<Vec<String>, Error> {
    let output = git_cmd("git ls-tree")?
        .arg("ls-tree")
        .arg("-r")
        .arg("--name-only")
        .arg(rev)
        .current_dir(path)
        .output()
        .await?;
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Number of commits reachable from `rev`.
#[cfg(test)]
pub(crate) async fn commit_count(path: &Path, rev: &str) -> anyhow::Result<usize> {
    let output = git_cmd("git rev-list")?
        .arg("rev-list")
        .arg("--count")
        .arg(rev)
        .current_dir(path)
        .output()
        .await?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().parse()?)
}
