use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, ValueEnum};
use hookprobe_consts::env_vars::EnvVars;

mod run;

pub(crate) use run::run;

#[derive(Copy, Clone)]
pub(crate) enum ExitStatus {
    /// Every hook was run.
    Success,

    /// The command was aborted by an error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::from(0),
            ExitStatus::Error => Self::from(2),
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub(crate) enum ColorChoice {
    /// Enables colored output only when the output is going to a terminal or TTY with support.
    Auto,

    /// Enables colored output regardless of the detected environment.
    Always,

    /// Disables colored output.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Exercise a git `post-checkout` hook in a throwaway repository.
///
/// For every hook found, a temporary repository with two branches is created, the
/// hook is installed into it, and the branches are checked out in turn. Whatever git
/// and the hook print is shown; nothing is asserted.
#[derive(Parser)]
#[command(name = "hookprobe", version)]
#[command(styles = STYLES)]
pub(crate) struct Cli {
    /// Hook files to test. Defaults to `post-checkout` and `post-checkout-simple` in
    /// the hook directory.
    #[arg(value_name = "HOOK")]
    pub(crate) hooks: Vec<PathBuf>,

    /// Directory searched for the default hooks [default: the directory containing
    /// this executable]. Ignored when hooks are given explicitly.
    #[arg(long, value_name = "DIR", env = EnvVars::HOOKPROBE_HOOKS_DIR)]
    pub(crate) hooks_dir: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) globals: GlobalArgs,
}

#[derive(Debug, clap::Args)]
pub(crate) struct GlobalArgs {
    /// Whether to use color in output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub(crate) color: ColorChoice,

    /// Use quiet output.
    ///
    /// Repeating this option, e.g., `-qq`, will enable a silent mode in which
    /// hookprobe will write no output to stdout.
    #[arg(short, long, conflicts_with = "verbose", action = clap::ArgAction::Count)]
    pub(crate) quiet: u8,

    /// Use verbose output.
    ///
    /// Shows the exit status of every checkout and enables debug logs. Repeat (`-vv`)
    /// for trace logs.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}
