use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use hookprobe_consts::{PRIMARY_HOOK, SIMPLE_HOOK};
use owo_colors::OwoColorize;
use tracing::{debug, trace};

use crate::cli::ExitStatus;
use crate::fixture::with_fixture;
use crate::printer::Printer;
use crate::runner;

/// Default hooks, in the order they are tested.
const DEFAULT_CANDIDATES: [(&str, &str); 2] = [("main", PRIMARY_HOOK), ("simple", SIMPLE_HOOK)];

const SEPARATOR_WIDTH: usize = 50;

/// A hook file to be tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) header: String,
    pub(crate) path: PathBuf,
}

/// The default hooks that exist in `dir`.
pub(crate) fn discover(dir: &Path) -> Vec<Candidate> {
    DEFAULT_CANDIDATES
        .iter()
        .filter_map(|(label, name)| {
            let path = dir.join(name);
            if path.is_file() {
                Some(Candidate {
                    header: format!("Testing {label} post-checkout hook"),
                    path,
                })
            } else {
                trace!("No `{name}` in `{}`", dir.display());
                None
            }
        })
        .collect()
}

/// Candidates for hooks named on the command line. All of them must exist.
fn explicit(hooks: Vec<PathBuf>) -> Result<Vec<Candidate>> {
    hooks
        .into_iter()
        .map(|path| {
            if !path.is_file() {
                bail!("Hook file `{}` does not exist", path.display());
            }
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(Candidate {
                header: format!("Testing `{name}`"),
                path,
            })
        })
        .collect()
}

/// The directory containing the running executable.
fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => bail!("Cannot determine the directory of `{}`", exe.display()),
    }
}

/// Test every candidate hook in its own fixture.
pub(crate) async fn run(
    hooks: Vec<PathBuf>,
    hooks_dir: Option<PathBuf>,
    printer: Printer,
) -> Result<ExitStatus> {
    let candidates = if hooks.is_empty() {
        let dir = match hooks_dir {
            Some(dir) => dir,
            None => executable_dir()?,
        };
        debug!("Looking for hooks in `{}`", dir.display());
        discover(&dir)
    } else {
        explicit(hooks)?
    };

    if candidates.is_empty() {
        debug!("No hooks to test");
        return Ok(ExitStatus::Success);
    }

    for candidate in &candidates {
        writeln!(
            printer.stdout_important(),
            "{}",
            format!("=== {} ===", candidate.header).bold()
        )?;

        with_fixture(async |fixture| runner::test_hook(fixture, &candidate.path, printer).await)
            .await?;

        writeln!(
            printer.stdout(),
            "\n{}\n",
            "=".repeat(SEPARATOR_WIDTH).dimmed()
        )?;
    }

    Ok(ExitStatus::Success)
}
