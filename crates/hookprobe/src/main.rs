use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hookprobe_consts::env_vars::EnvVars;
use owo_colors::OwoColorize;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, ExitStatus};
use crate::printer::Printer;

mod cli;
mod fixture;
mod git;
mod hook;
mod printer;
mod process;
mod runner;

/// Install the global tracing subscriber.
///
/// `-v` enables debug logs and `-vv` trace logs; `HOOKPROBE_LOG` takes precedence.
fn setup_logging(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(EnvVars::HOOKPROBE_LOG)
        .from_env()
        .context("Invalid `HOOKPROBE_LOG` filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .without_time()
        .with_writer(anstream::stderr)
        .finish()
        .try_init()
        .context("Failed to install the logger")?;

    Ok(())
}

async fn run(cli: Cli) -> Result<ExitStatus> {
    anstream::ColorChoice::from(cli.globals.color).write_global();

    let printer = match (cli.globals.quiet, cli.globals.verbose) {
        (0, 0) => Printer::Default,
        (0, _) => Printer::Verbose,
        (1, _) => Printer::Quiet,
        _ => Printer::Silent,
    };

    setup_logging(cli.globals.verbose)?;
    debug!("hookprobe {}", env!("CARGO_PKG_VERSION"));

    cli::run(cli.hooks, cli.hooks_dir, printer).await
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build the async runtime")
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(status) => status.into(),
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                for (index, cause) in err.chain().enumerate() {
                    if index == 0 {
                        anstream::eprintln!("{}: {cause}", "error".red().bold());
                    } else {
                        anstream::eprintln!("  {}: {cause}", "caused by".red().bold());
                    }
                }
            }
            ExitStatus::Error.into()
        }
    }
}
