//! Block parsing and the booking session built around it.
//!
//! ```text
//! pasted block ── split lines, trim, drop empty
//!              ── Matcher::match_line per line    (first pass)
//!              ── Matcher::retry_line per failure (second pass, optional)
//!              ── entries in line order + failed lines verbatim
//! ```
//!
//! Lines are independent: a failed line never affects its neighbours.

use crate::api::{Context, Options, compiled_rules, retry_rule};
use crate::booking::{BookingEntry, NumberType, SubType, SubmissionItem};
use crate::engine::{Disposition, FailedLine, LineTrace, Matcher, ParseOutcome};
use crate::entry::EntryFactory;
use crate::error::{FormError, RejectionReason, SubmitError};
use crate::expand::Expansion;
use crate::form::{self, FormInput};
use crate::ledger::{BookingLedger, LedgerTotals};
use std::time::Instant;
use tracing::{debug, info};

/// Everything a pasted block produced.
#[derive(Debug, Clone, Default)]
pub struct BlockParse {
    /// Accepted entries, in line order.
    pub entries: Vec<BookingEntry>,
    /// Non-empty lines nothing could be made of.
    pub failed: Vec<FailedLine>,
    /// Number type of the last line that produced entries.
    pub last_number_type: Option<NumberType>,
    /// One trace per non-empty line.
    pub traces: Vec<LineTrace>,
    /// Lines recovered by the second pass.
    pub recovered: usize,
}

impl BlockParse {
    pub fn into_parts(self) -> (Vec<BookingEntry>, Vec<FailedLine>) {
        (self.entries, self.failed)
    }
}

/// Per-line state kept until the second pass is done.
struct Slot {
    entries: Vec<BookingEntry>,
    failed: Option<FailedLine>,
}

/// Drives the matcher over every line of a block.
#[derive(Debug)]
pub struct ParseSession<'a> {
    matcher: Matcher<'a>,
    second_pass: bool,
}

impl<'a> ParseSession<'a> {
    /// A session over the default rule table.
    pub fn new(factory: &'a EntryFactory, second_pass: bool) -> Self {
        let matcher = Matcher::new(compiled_rules(), factory).with_retry(retry_rule());
        ParseSession { matcher, second_pass }
    }

    pub fn matcher(&self) -> &Matcher<'a> {
        &self.matcher
    }

    pub fn parse_block(&self, text: &str) -> BlockParse {
        let start = Instant::now();
        let mut slots = Vec::new();
        let mut traces = Vec::new();

        for line in text.split(['\n', '\r']).map(str::trim).filter(|l| !l.is_empty()) {
            let line_start = Instant::now();
            let (slot, rule, disposition) = match self.matcher.match_line(line) {
                ParseOutcome::Parsed(parsed) => {
                    (Slot { entries: parsed.entries, failed: None }, Some(parsed.rule), Disposition::Parsed)
                }
                ParseOutcome::Ignored => (Slot { entries: Vec::new(), failed: None }, None, Disposition::Ignored),
                ParseOutcome::Failed(failed) => {
                    let rule = failed.rule;
                    (Slot { entries: Vec::new(), failed: Some(failed) }, rule, Disposition::Failed)
                }
            };
            traces.push(LineTrace {
                line: line.to_string(),
                rule,
                disposition,
                entries: slot.entries.len(),
                duration: line_start.elapsed(),
            });
            slots.push(slot);
        }

        let recovered = if self.second_pass { self.retry_failures(&mut slots, &mut traces) } else { 0 };

        let mut out = BlockParse { traces, recovered, ..BlockParse::default() };
        for slot in slots {
            out.entries.extend(slot.entries);
            out.failed.extend(slot.failed);
        }
        out.last_number_type = out.entries.last().map(BookingEntry::number_type);

        info!(
            lines = out.traces.len(),
            entries = out.entries.len(),
            failed = out.failed.len(),
            recovered = out.recovered,
            elapsed_us = start.elapsed().as_micros() as u64,
            "block parsed"
        );
        out
    }

    fn retry_failures(&self, slots: &mut [Slot], traces: &mut [LineTrace]) -> usize {
        let mut recovered = 0;
        for (slot, trace) in slots.iter_mut().zip(traces.iter_mut()) {
            let Some(failed) = &slot.failed else {
                continue;
            };
            let retry_start = Instant::now();
            let Some(parsed) = self.matcher.retry_line(&failed.line) else {
                continue;
            };
            trace.rule = Some(parsed.rule);
            trace.disposition = Disposition::Recovered;
            trace.entries = parsed.entries.len();
            trace.duration += retry_start.elapsed();
            slot.entries = parsed.entries;
            slot.failed = None;
            recovered += 1;
        }
        recovered
    }
}

/// Outcome of [`BookingSession::paste`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteReport {
    /// Entries added to the ledger.
    pub added: usize,
    /// Lines to show back to the user.
    pub failed: Vec<FailedLine>,
    /// Digit mode after the paste.
    pub digit_mode: NumberType,
}

/// External submission call.
pub trait BookingSubmitter {
    fn submit(&mut self, items: &[SubmissionItem]) -> Result<(), SubmitError>;
}

/// The bill being built: ledger, pricing and the current digit mode.
#[derive(Debug)]
pub struct BookingSession {
    factory: EntryFactory,
    ledger: BookingLedger,
    digit_mode: NumberType,
    second_pass: bool,
}

impl BookingSession {
    pub fn new(context: &Context, options: &Options, digit_mode: NumberType) -> Self {
        BookingSession {
            factory: options.factory(context),
            ledger: BookingLedger::new(),
            digit_mode,
            second_pass: options.second_pass,
        }
    }

    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    pub fn factory(&self) -> &EntryFactory {
        &self.factory
    }

    pub fn digit_mode(&self) -> NumberType {
        self.digit_mode
    }

    pub fn set_digit_mode(&mut self, digit_mode: NumberType) {
        self.digit_mode = digit_mode;
    }

    pub fn totals(&self) -> Result<LedgerTotals, RejectionReason> {
        self.ledger.totals()
    }

    /// Parse a pasted block into the ledger.
    ///
    /// The digit mode follows the last line that produced entries.
    pub fn paste(&mut self, text: &str) -> PasteReport {
        let block = ParseSession::new(&self.factory, self.second_pass).parse_block(text);
        if let Some(number_type) = block.last_number_type {
            self.digit_mode = number_type;
        }
        let (entries, failed) = block.into_parts();
        let added = entries.len();
        self.ledger.append(entries);
        PasteReport { added, failed, digit_mode: self.digit_mode }
    }

    /// Run the form through the normalizer into the ledger. The digit mode is left alone.
    pub fn add_form(&mut self, input: &FormInput) -> Result<Expansion, FormError> {
        let expansion = form::apply(&self.factory, input)?;
        self.ledger.append(expansion.entries.clone());
        Ok(expansion)
    }

    pub fn edit(
        &mut self,
        index: usize,
        number: &str,
        count: u32,
        sub_type: SubType,
    ) -> Result<&BookingEntry, RejectionReason> {
        self.ledger.edit(&self.factory, index, number, count, sub_type)
    }

    pub fn remove(&mut self, index: usize) -> Option<BookingEntry> {
        self.ledger.remove(index)
    }

    /// Hand the ledger to `submitter`; it is cleared only when the call succeeds.
    pub fn submit(&mut self, submitter: &mut dyn BookingSubmitter) -> Result<usize, SubmitError> {
        if self.ledger.is_empty() {
            return Err(SubmitError::Empty);
        }
        let items = self.ledger.submission();
        submitter.submit(&items)?;
        debug!(items = items.len(), "ledger submitted");
        self.ledger.clear();
        Ok(items.len())
    }
}
