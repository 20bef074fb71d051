//! Per-line traces.
//!
//! The matcher records how each line was decided. The default parse path
//! keeps these small; verbose parsing and the CLI report surface them.

use std::time::Duration;

/// How a line was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A rule matched and every produced triple priced.
    Parsed,
    /// Chat chatter or a metadata-only header.
    Ignored,
    /// No rule matched, or the match failed validation.
    Failed,
    /// Failed in the first pass, recovered by the ABC retry.
    Recovered,
}

#[derive(Debug, Clone)]
pub struct LineTrace {
    /// The line as pasted (trimmed).
    pub line: String,
    /// Rule that decided the line, if any.
    pub rule: Option<&'static str>,
    pub disposition: Disposition,
    /// Entries produced for this line.
    pub entries: usize,
    pub duration: Duration,
}
