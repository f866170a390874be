use std::fmt;

/// How much console output the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Printer {
    /// Nothing is written at all.
    Silent,
    /// Only output that is important to the user is written.
    Quiet,
    /// The normal report.
    Default,
    /// The normal report plus details such as exit statuses.
    Verbose,
}

impl Printer {
    /// The report itself.
    pub(crate) fn stdout(self) -> Stdout {
        match self {
            Self::Silent | Self::Quiet => Stdout::Disabled,
            Self::Default | Self::Verbose => Stdout::Enabled,
        }
    }

    /// Output that should be shown even in quiet mode.
    pub(crate) fn stdout_important(self) -> Stdout {
        match self {
            Self::Silent => Stdout::Disabled,
            Self::Quiet | Self::Default | Self::Verbose => Stdout::Enabled,
        }
    }

    /// Details only shown with `--verbose`.
    pub(crate) fn verbose(self) -> Stdout {
        match self {
            Self::Verbose => Stdout::Enabled,
            Self::Silent | Self::Quiet | Self::Default => Stdout::Disabled,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Stdout {
    Enabled,
    Disabled,
}

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self {
            Self::Enabled => {
                #[allow(clippy::print_stdout, clippy::ignored_unit_patterns)]
                {
                    anstream::print!("{s}");
                }
            }
            Self::Disabled => {}
        }
        Ok(())
    }
}
