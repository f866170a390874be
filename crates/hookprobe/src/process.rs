use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};

use owo_colors::OwoColorize;
use tracing::trace;

/// An error from executing a [`Cmd`].
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Failed to run `{summary}`")]
    Exec {
        summary: String,
        #[source]
        cause: std::io::Error,
    },
    #[error("Command `{summary}` exited with an error:\n{error}")]
    Status { summary: String, error: StatusError },
}

/// A checked command exited with a non-zero status.
#[derive(Debug)]
pub(crate) struct StatusError {
    pub(crate) status: ExitStatus,
    pub(crate) output: Option<Output>,
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n{}\n{}", "[status]".red(), self.status)?;

        if let Some(output) = &self.output {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = stdout.trim();
            let stderr = stderr.trim();
            if !stdout.is_empty() {
                writeln!(f, "\n{}\n{stdout}", "[stdout]".red())?;
            }
            if !stderr.is_empty() {
                writeln!(f, "\n{}\n{stderr}", "[stderr]".red())?;
            }
        }

        Ok(())
    }
}

/// A wrapper around [`tokio::process::Command`] that carries a short human readable
/// summary for error messages, and optionally checks the exit status.
pub(crate) struct Cmd {
    inner: tokio::process::Command,
    summary: String,
    check: bool,
}

impl Cmd {
    /// Create a new command, checked by default.
    pub(crate) fn new(program: impl AsRef<OsStr>, summary: impl Into<String>) -> Self {
        let mut inner = tokio::process::Command::new(program);
        inner.stdin(Stdio::null());
        Self {
            inner,
            summary: summary.into(),
            check: true,
        }
    }

    /// Whether a non-zero exit status is turned into [`Error::Status`].
    pub(crate) fn check(&mut self, check: bool) -> &mut Self {
        self.check = check;
        self
    }

    pub(crate) fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.inner.arg(arg);
        self
    }

    pub(crate) fn current_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.inner.current_dir(dir);
        self
    }

    pub(crate) fn env_remove(&mut self, key: impl AsRef<OsStr>) -> &mut Self {
        self.inner.env_remove(key);
        self
    }

    /// Run the command to completion, capturing stdout and stderr.
    pub(crate) async fn output(&mut self) -> Result<Output, Error> {
        trace!(cmd = %self, "Executing");
        let output = self.inner.output().await.map_err(|cause| Error::Exec {
            summary: self.summary.clone(),
            cause,
        })?;
        trace!(cmd = %self, status = %output.status, "Finished");
        self.maybe_check_output(&output)?;
        Ok(output)
    }

    fn maybe_check_output(&self, output: &Output) -> Result<(), Error> {
        if self.check && !output.status.success() {
            return Err(Error::Status {
                summary: self.summary.clone(),
                error: StatusError {
                    status: output.status,
                    output: Some(output.clone()),
                },
            });
        }
        Ok(())
    }
}

impl Display for Cmd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let command = self.inner.as_std();
        write!(f, "{}", command.get_program().to_string_lossy())?;
        for arg in command.get_args() {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        if let Some(dir) = command.get_current_dir() {
            write!(f, " (in {})", dir.display())?;
        }
        Ok(())
    }
}
