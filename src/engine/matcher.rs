//! First-match rule evaluation for one line.
//!
//! Per line:
//!
//! ```text
//! (0) RawLine::split        -> strip chat prefix, keep it for failure reports
//! (1) header only / chatter -> Ignored
//! (2) trigger scan          -> buckets, active rules in table order
//! (3) first matching rule   -> production -> RawBooking triples
//!        Split rules        -> each comma group matched on its own
//! (4) expand + price        -> entries, or Failed with the rejection
//! ```
//!
//! A syntactic match that fails validation is a failure of the whole line,
//! not a partial success. The exception is a comma-group line, which succeeds
//! when any of its groups does.

use super::compiled_rules::CompiledRules;
use super::trigger::TriggerInfo;
use crate::booking::{BookingEntry, RawBooking};
use crate::entry::EntryFactory;
use crate::error::RejectionReason;
use crate::expand::expand_raw;
use crate::rules::booking::predicates::is_chatter;
use crate::rules::metadata::RawLine;
use crate::{Groups, Pattern, Rule};
use tracing::{debug, trace, warn};

/// A line (or comma group) that produced entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub rule: &'static str,
    pub bookings: Vec<RawBooking>,
    pub entries: Vec<BookingEntry>,
    /// Comma groups that failed while a sibling group succeeded.
    pub dropped_groups: Vec<String>,
}

/// A line nothing could be made of, kept verbatim for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLine {
    /// The line as pasted, chat prefix included.
    pub line: String,
    /// Rule that matched syntactically, if any.
    pub rule: Option<&'static str>,
    /// Validation failure of the matched triples, if that is why it failed.
    pub reason: Option<RejectionReason>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(ParsedLine),
    Ignored,
    Failed(FailedLine),
}

/// Result of matching a prefix-stripped message.
enum Decision {
    Parsed(ParsedLine),
    Failed { rule: Option<&'static str>, reason: Option<RejectionReason> },
}

/// Walks the compiled rule table over single lines.
#[derive(Debug)]
pub struct Matcher<'a> {
    compiled: &'a CompiledRules<'a>,
    factory: &'a EntryFactory,
    retry: Option<&'a Rule>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(compiled: &'a CompiledRules<'a>, factory: &'a EntryFactory) -> Self {
        Matcher { compiled, factory, retry: None }
    }

    /// Attach the rule used by [`retry_line`](Self::retry_line).
    pub(crate) fn with_retry(mut self, rule: &'a Rule) -> Self {
        self.retry = Some(rule);
        self
    }

    pub fn factory(&self) -> &EntryFactory {
        self.factory
    }

    /// Decide one pasted line.
    pub fn match_line(&self, line: &str) -> ParseOutcome {
        let raw = RawLine::split(line.trim());
        if raw.is_header_only() || is_chatter(&raw.message) {
            debug!(line = %raw.original, "line ignored");
            return ParseOutcome::Ignored;
        }

        match self.match_message(&raw.message) {
            Decision::Parsed(parsed) => {
                debug!(line = %raw.original, rule = parsed.rule, entries = parsed.entries.len(), "line parsed");
                ParseOutcome::Parsed(parsed)
            }
            Decision::Failed { rule, reason } => {
                debug!(line = %raw.original, rule = ?rule, reason = ?reason, "line failed");
                ParseOutcome::Failed(FailedLine { line: raw.original, rule, reason })
            }
        }
    }

    /// Second chance for a failed line with the narrow retry rule.
    ///
    /// Tries the stripped message, the line as pasted, then the text after
    /// each `:` from the first one on, in case an unrecognized sender prefix
    /// hid the booking. The booking itself may use `:` as a separator.
    pub fn retry_line(&self, line: &str) -> Option<ParsedLine> {
        let rule = self.retry?;
        let raw = RawLine::split(line.trim());
        let tails = raw.original.match_indices(':').map(|(idx, _)| raw.original[idx + 1..].trim());
        let candidates = [raw.message.as_str(), raw.original.as_str()].into_iter().chain(tails);

        for candidate in candidates.filter(|c| !c.is_empty()) {
            if let Some(Decision::Parsed(parsed)) = self.apply_rule(rule, candidate) {
                debug!(line = %raw.original, candidate = %candidate, "line recovered");
                return Some(parsed);
            }
        }
        None
    }

    fn match_message(&self, message: &str) -> Decision {
        let info = TriggerInfo::scan(message);
        let active = self.compiled.active_for(info.buckets);
        trace!(text = message, buckets = ?info.buckets, active = active.len(), "rule gating");

        for id in active {
            let rule = self.compiled.rules[id];
            if let Some(decision) = self.apply_rule(rule, message) {
                return decision;
            }
        }
        Decision::Failed { rule: None, reason: None }
    }

    /// `None` when the rule's pattern does not match `message`.
    fn apply_rule(&self, rule: &Rule, message: &str) -> Option<Decision> {
        match &rule.pattern {
            Pattern::Regex(re) => {
                let caps = re.captures(message)?;
                let whole = caps.get(0)?;
                if whole.start() != 0 || whole.end() != message.len() {
                    return None;
                }
                trace!(rule = rule.name, text = message, "rule matched");
                let groups = Groups::from_captures(&caps);
                let Some(bookings) = (rule.production)(&groups) else {
                    return Some(Decision::Failed { rule: Some(rule.name), reason: None });
                };
                Some(self.validate(rule.name, bookings))
            }
            Pattern::Split { gate, on } => {
                if !gate.is_match(message) {
                    return None;
                }
                trace!(rule = rule.name, text = message, "split rule matched");
                Some(self.match_groups(rule.name, message, *on))
            }
        }
    }

    /// Price every triple; one rejection fails the whole line.
    fn validate(&self, rule: &'static str, bookings: Vec<RawBooking>) -> Decision {
        let mut entries = Vec::new();
        for booking in &bookings {
            match expand_raw(self.factory, booking) {
                Ok(expanded) => entries.extend(expanded),
                Err(reason) => return Decision::Failed { rule: Some(rule), reason: Some(reason) },
            }
        }
        Decision::Parsed(ParsedLine { rule, bookings, entries, dropped_groups: Vec::new() })
    }

    fn match_groups(&self, rule: &'static str, message: &str, on: char) -> Decision {
        let mut out = ParsedLine { rule, bookings: Vec::new(), entries: Vec::new(), dropped_groups: Vec::new() };
        let mut last_reason = None;

        for group in message.split(on).map(str::trim).filter(|g| !g.is_empty()) {
            // Groups hold no separator, so the split rule cannot fire again.
            match self.match_message(group) {
                Decision::Parsed(parsed) => {
                    out.bookings.extend(parsed.bookings);
                    out.entries.extend(parsed.entries);
                }
                Decision::Failed { reason, .. } => {
                    last_reason = reason.or(last_reason);
                    out.dropped_groups.push(group.to_string());
                }
            }
        }

        if out.entries.is_empty() {
            return Decision::Failed { rule: Some(rule), reason: last_reason };
        }
        if !out.dropped_groups.is_empty() {
            warn!(rule, dropped = ?out.dropped_groups, "comma groups dropped");
        }
        Decision::Parsed(out)
    }
}
