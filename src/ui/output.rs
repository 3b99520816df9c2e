//! ui::output
//!
//! Console output helpers.
//!
//! Results and confirmations go to stdout; warnings, diagnostics, and
//! errors go to stderr. Quiet mode silences everything except errors,
//! which ignore the level entirely.

use std::fmt::Display;

/// How much the command surface says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Results, confirmations, warnings.
    Normal,
    /// Everything, plus diagnostics on stderr.
    Debug,
}

impl Verbosity {
    /// Resolve the level from the global flags; quiet wins over debug.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Write a result or confirmation to stdout unless quiet.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Write a diagnostic to stderr at debug level only.
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Write an error to stderr regardless of level.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Write a warning to stderr unless quiet.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Join items into one prefixed line per item.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
