use std::fmt::Write;
use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::fixture::Fixture;
use crate::git;
use crate::hook;
use crate::printer::Printer;

/// What one `git checkout` produced.
#[derive(Debug)]
pub(crate) struct CheckoutOutput {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl From<Output> for CheckoutOutput {
    fn from(output: Output) -> Self {
        Self {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Install `hook` into `fixture` and switch branches twice, printing what git says.
///
/// Nothing about the checkouts is judged: non-zero exits and stderr are reported as is,
/// and a checkout git could not be launched for does not stop the next one.
pub(crate) async fn test_hook(fixture: &Fixture, hook: &Path, printer: Printer) -> Result<()> {
    let installation = hook::install(fixture, hook).await?;
    debug!(?installation, "Hook installed");

    writeln!(
        printer.stdout(),
        "Testing post-checkout hook in {}",
        fixture.path().display().cyan()
    )?;

    let checkouts = [
        (fixture.default_branch(), "Git checkout output:"),
        (fixture.feature_branch(), "\nSwitching to feature branch:"),
    ];
    for (branch, label) in checkouts {
        let result = git::checkout(fixture.path(), branch)
            .await
            .map(CheckoutOutput::from);
        report_checkout(result, branch, label, printer)?;
    }

    Ok(())
}

/// Print the outcome of one checkout.
fn report_checkout(
    result: Result<CheckoutOutput, git::Error>,
    branch: &str,
    label: &str,
    printer: Printer,
) -> std::fmt::Result {
    report_checkout_to(
        &mut printer.stdout(),
        &mut printer.stdout_important(),
        &mut printer.verbose(),
        result,
        branch,
        label,
    )
}

fn report_checkout_to(
    stdout: &mut impl Write,
    important: &mut impl Write,
    verbose: &mut impl Write,
    result: Result<CheckoutOutput, git::Error>,
    branch: &str,
    label: &str,
) -> std::fmt::Result {
    match result {
        Ok(output) => report_to(stdout, verbose, &output, label),
        Err(err) => {
            debug!("Checkout of `{branch}` could not run: {err:?}");
            writeln!(important, "{} {err}", "Git checkout failed:".red().bold())
        }
    }
}

/// Print a checkout's stdout, and its stderr only when there is some.
///
/// Both streams are printed as captured, followed by a newline.
fn report_to(
    stdout: &mut impl Write,
    verbose: &mut impl Write,
    output: &CheckoutOutput,
    label: &str,
) -> std::fmt::Result {
    writeln!(stdout, "{}", label.bold())?;
    writeln!(stdout, "{}", output.stdout)?;
    if !output.stderr.is_empty() {
        writeln!(stdout, "{}", "Errors:".yellow().bold())?;
        writeln!(stdout, "{}", output.stderr)?;
    }
    let status = match output.status.code() {
        Some(code) => format!("- exit code: {code}"),
        None => format!("- {}", output.status),
    };
    writeln!(verbose, "{}", status.dimmed())?;
    Ok(())
}
