use crate::booking::{BookingEntry, NumberType};
use crate::engine::{CompiledRules, Disposition, FailedLine, LineTrace};
use crate::entry::EntryFactory;
use crate::pricing::{PricingTable, Rounding};
use crate::session::ParseSession;
use crate::Rule;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::{Duration, Instant};

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::booking::rules::get);
static COMPILED_RULES: Lazy<CompiledRules<'static>> = Lazy::new(|| CompiledRules::new(&DEFAULT_RULES));
static ABC_RETRY: Lazy<Rule> = Lazy::new(crate::rules::booking::rules::abc_retry);

/// The default rule table, compiled once.
pub(crate) fn compiled_rules() -> &'static CompiledRules<'static> {
    &COMPILED_RULES
}

pub(crate) fn retry_rule() -> &'static Rule {
    &ABC_RETRY
}

/// Parsing context.
///
/// This holds the environment needed to price entries.
#[derive(Clone)]
pub struct Context {
    /// Pricing collaborator, read-only.
    pub pricing: Arc<dyn PricingTable>,
}

impl Context {
    pub fn new(pricing: impl PricingTable + 'static) -> Self {
        Self { pricing: Arc::new(pricing) }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("pricing", &"<table>").finish()
    }
}

/// Options that affect parsing and pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Rounding applied to every priced amount.
    pub rounding: Rounding,
    /// Retry failed lines with the narrow `ABC` shape.
    pub second_pass: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { rounding: Rounding::default(), second_pass: true }
    }
}

impl Options {
    pub(crate) fn factory(&self, context: &Context) -> EntryFactory {
        EntryFactory::new(Arc::clone(&context.pricing), self.rounding)
    }
}

/// Result from [`parse`] and [`parse_with`].
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed text.
    pub text: String,
    /// Accepted entries in line order.
    pub entries: Vec<BookingEntry>,
    /// Lines that could not be understood, verbatim.
    pub failed: Vec<FailedLine>,
    /// Number type of the last line that produced entries.
    pub last_number_type: Option<NumberType>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// A compact per-line summary used in verbose traces.
#[derive(Debug, Clone)]
pub struct LineSummary {
    pub line: String,
    pub rule: String,
    pub disposition: Disposition,
    pub entries: usize,
    pub duration: Duration,
}

/// Additional details returned by [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    pub total: Duration,
    pub lines: Vec<LineSummary>,
    /// Rule names in priority order.
    pub rule_table: Vec<String>,
    /// Lines recovered by the second pass.
    pub recovered: usize,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub result: ParseResult,
    pub details: ParseDetails,
}

/// Parse a pasted block with default [`Options`].
pub fn parse(text: &str, context: &Context) -> ParseResult {
    parse_with(text, context, &Options::default())
}

/// Parse a pasted block with the provided `context`/`options`.
pub fn parse_with(text: &str, context: &Context, options: &Options) -> ParseResult {
    parse_verbose_with(text, context, options).result
}

/// Parse and also return per-line traces.
pub fn parse_verbose_with(text: &str, context: &Context, options: &Options) -> ParseResultVerbose {
    let start = Instant::now();
    let factory = options.factory(context);
    let block = ParseSession::new(&factory, options.second_pass).parse_block(text);
    let elapsed = start.elapsed();

    let details = ParseDetails {
        total: elapsed,
        lines: block.traces.iter().map(trace_to_summary).collect(),
        rule_table: compiled_rules().names().into_iter().map(str::to_string).collect(),
        recovered: block.recovered,
    };
    let result = ParseResult {
        text: text.to_string(),
        entries: block.entries,
        failed: block.failed,
        last_number_type: block.last_number_type,
        elapsed,
    };
    ParseResultVerbose { result, details }
}

fn trace_to_summary(trace: &LineTrace) -> LineSummary {
    LineSummary {
        line: trace.line.chars().take(80).collect(),
        rule: trace.rule.unwrap_or("-").to_string(),
        disposition: trace.disposition,
        entries: trace.entries,
        duration: trace.duration,
    }
}
