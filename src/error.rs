//! Error types of the public API.
//!
//! Free-text failures are not errors: they are collected as
//! [`crate::FailedLine`] values. Everything here is a synchronous rejection the
//! caller must show to the user.

use crate::booking::{NumberType, SubType};
use thiserror::Error;

/// Why the Entry Factory or an expansion strategy refused an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("number '{0}' must contain digits only")]
    NotDigits(String),

    #[error("number '{number}' has {len} digits, expected {expected}")]
    LengthMismatch { number: String, len: usize, expected: usize },

    #[error("number '{0}' must have 1, 2 or 3 digits")]
    UnsupportedLength(String),

    #[error("count must be greater than zero")]
    ZeroCount,

    #[error("single digit bookings need a count of at least {minimum}, got {count}")]
    SingleDigitMinimum { count: u32, minimum: u32 },

    #[error("BOX needs a 3 digit number, got '{0}'")]
    BoxRequiresThreeDigits(String),

    #[error("sub-type {sub_type} cannot be booked on a {number_type} number")]
    SubTypeMismatch { sub_type: SubType, number_type: NumberType },

    #[error("sub-type {0} must be expanded before it can be booked")]
    MetaSubType(SubType),

    #[error("no pricing configured for {0} bookings")]
    PricingUnavailable(NumberType),

    #[error("amount is too large to represent")]
    AmountOverflow,

    #[error("range start '{start}' is after end '{end}'")]
    RangeOrder { start: String, end: String },

    #[error("range bounds '{start}' and '{end}' differ in length")]
    RangeLengthMismatch { start: String, end: String },

    #[error("difference must be greater than zero")]
    ZeroStep,

    #[error("no entry at position {0}")]
    NoSuchEntry(usize),
}

/// Structured-input (form) validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("enter a number")]
    EmptyNumber,

    /// Every offending token of a multi-number field, in input order.
    #[error("invalid numbers: {}", .0.join(", "))]
    InvalidNumbers(Vec<String>),

    #[error("count '{0}' is not a valid number")]
    InvalidCount(String),

    #[error("{0} mode accepts a single number")]
    MultipleNumbersNotAllowed(&'static str),

    #[error("enter the range end")]
    MissingRangeEnd,

    #[error("enter the difference")]
    MissingDifference,

    #[error(transparent)]
    Rejected(#[from] RejectionReason),
}

/// Pricing configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pricing JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

/// Failure reported by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("nothing to submit")]
    Empty,

    #[error("submission rejected: {0}")]
    Rejected(String),
}
