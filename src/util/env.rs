//! Terminal color detection.
//!
//! Color is off when `--no-color` is given, when `NO_COLOR` is set to any
//! value, when `TERM=dumb`, or when the target stream is not a terminal.

use std::io::IsTerminal;

/// Output stream a color decision applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn is_terminal(self) -> bool {
        match self {
            Self::Stdout => std::io::stdout().is_terminal(),
            Self::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

/// Whether ANSI colors should be written to `stream`.
#[must_use]
pub fn color_enabled(stream: Stream, no_color_flag: bool) -> bool {
    color_permitted(no_color_flag, |key| std::env::var(key).ok()) && stream.is_terminal()
}

fn color_permitted(no_color_flag: bool, env: impl Fn(&str) -> Option<String>) -> bool {
    !no_color_flag && env("NO_COLOR").is_none() && env("TERM").as_deref() != Some("dumb")
}
