//! Free-text matching engine.
//!
//! This module is the entry point for turning one pasted line into booking
//! entries. It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! rules (ordered table) ──┐
//!                         │  CompiledRules::new           (compiled_rules.rs)
//!                         └───────────────┬──────────────
//!                                         │
//! line ── RawLine::split (metadata) ──────┤
//!      ── TriggerInfo::scan ──────────────┼─ select rules whose buckets are present
//!         (trigger.rs)                    │  (table order is kept)
//!                                         v
//!                               Matcher::match_line (matcher.rs)
//!                                 - ignore shape?      -> Ignored
//!                                 - first rule to match wins
//!                                 - production -> RawBooking triples
//!                                 - expand + price     -> entries
//!                                         │
//!                                         v
//!                       ParseOutcome::{Parsed, Ignored, Failed}
//! ```
//!
//! Nothing is combined across rules: rule order *is* the grammar's
//! disambiguation, so the table in `rules/booking/rules.rs` is the single
//! place that decides priority.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: derives per-rule metadata (`BucketMask`) once.
//! - `trigger.rs`: scans a line for coarse buckets (digits, letters, commas, symbols).
//! - `matcher.rs`: prefix stripping, ignore shape, first-match evaluation,
//!   comma-group recursion and semantic validation.
//! - `metrics.rs`: per-line traces used by verbose parsing and the CLI report.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events: `trace` for rule gating, `debug` for
//! every decided line.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/trigger.rs"]
mod trigger;

pub use compiled_rules::BucketMask;
pub(crate) use compiled_rules::CompiledRules;
pub use matcher::{FailedLine, Matcher, ParseOutcome, ParsedLine};
pub use metrics::{Disposition, LineTrace};
#[allow(unused_imports)]
pub use trigger::TriggerInfo;
