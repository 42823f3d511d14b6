/// How much of the scanner's tracing output reaches stderr.
///
/// Derived from `-q` and the number of `-v` flags; `RUST_LOG` still wins when
/// it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only. Skipped directories are still reported.
    Quiet,
    /// Connection and login events.
    Normal,
    /// Adds swallowed probe failures and listing fallbacks from this crate.
    Verbose,
    /// Everything from this crate, plus debug output from the wire clients.
    Trace,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose_count: u8) -> Self {
        match (quiet, verbose_count) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Trace,
        }
    }

    /// `EnvFilter` directive for this level.
    ///
    /// Verbose levels only raise this crate's target so that `suppaftp`
    /// command traces stay out of `-v` output.
    pub fn as_tracing_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "info,remotefs=debug",
            Verbosity::Trace => "debug,remotefs=trace",
        }
    }
}

impl From<(bool, u8)> for Verbosity {
    fn from((quiet, verbose_count): (bool, u8)) -> Self {
        Verbosity::from_flags(quiet, verbose_count)
    }
}
