extern crate self as bookslip;

use regex::Regex;

#[macro_use]
mod macros;
mod api;
mod booking;
mod engine;
mod entry;
mod error;
mod expand;
mod form;
mod ledger;
mod pricing;
mod rules;
mod session;

pub use api::{Context, LineSummary, Options, ParseDetails, ParseResult, ParseResultVerbose, parse, parse_verbose_with, parse_with};
pub use booking::{BookingEntry, NumberType, RawBooking, SubType, SubmissionItem};
pub use engine::{Disposition, FailedLine, LineTrace, Matcher, ParseOutcome, ParsedLine};
pub use entry::{EntryFactory, SINGLE_DIGIT_MIN_COUNT};
pub use error::{ConfigError, FormError, RejectionReason, SubmitError};
pub use expand::{Expansion, Instruction, expand, expand_raw, permutations};
pub use form::{EntryMode, FormInput, apply as apply_form, normalize as normalize_form};
pub use ledger::{BookingLedger, LedgerTotals};
pub use pricing::{CommissionMode, PriceConfig, Pricing, PricingTable, Rounding};
pub use rules::metadata::{ChatMetadata, RawLine};
pub use session::{BlockParse, BookingSession, BookingSubmitter, ParseSession, PasteReport};

// --- Internal rule types ----------------------------------------------------

/// Capture groups of a rule's regex, lowercased. Index 0 is the whole match;
/// groups that did not participate are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Groups(Vec<Option<String>>);

impl Groups {
    pub(crate) fn from_captures(caps: &regex::Captures<'_>) -> Self {
        Groups((0..caps.len()).map(|i| caps.get(i).map(|g| g.as_str().to_lowercase())).collect())
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).and_then(|g| g.as_deref())
    }
}

/// What a rule matches against the (prefix-stripped, trimmed) line.
#[derive(Debug)]
pub(crate) enum Pattern {
    /// The regex must match the whole line; its groups feed the production.
    Regex(&'static Regex),

    /// The gate must match the whole line, which is then split on `on` and
    /// every non-empty group is matched through the rule table on its own.
    Split { gate: &'static Regex, on: char },
}

pub(crate) type Production = Box<dyn Fn(&Groups) -> Option<Vec<RawBooking>> + Send + Sync>;

/// A free-text rule: a name, a pattern and a production turning capture
/// groups into raw bookings. Rules are tried in table order; the first rule
/// whose pattern matches decides the line.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: Pattern,
    pub production: Production,
    /// Bucket mask - every bucket must be present in the line for the rule to be tried.
    pub buckets: u32,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("production", &"<function>")
            .field("buckets", &self.buckets)
            .finish()
    }
}
