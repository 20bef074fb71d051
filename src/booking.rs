//! Booking domain types.
//!
//! A booked number is classified purely by its decimal length:
//!
//! ```text
//! "7"   -> SingleDigit -> A | B | C
//! "34"  -> DoubleDigit -> AB | BC | AC
//! "123" -> TripleDigit -> SUPER | BOX   (SET / BOTH resolve into these)
//! ```
//!
//! `ALL`, `SET` and `BOTH` are *meta* sub-types: instructions for the
//! expansion strategies, never stored on a [`BookingEntry`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking type, derived from the digit length of the booked number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberType {
    SingleDigit,
    DoubleDigit,
    TripleDigit,
}

impl NumberType {
    /// Map a digit length to its booking type. Lengths outside 1..=3 are invalid.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(NumberType::SingleDigit),
            2 => Some(NumberType::DoubleDigit),
            3 => Some(NumberType::TripleDigit),
            _ => None,
        }
    }

    /// Classify a number string; `None` unless it is 1-3 ASCII digits.
    pub fn of(number: &str) -> Option<Self> {
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::from_len(number.len())
    }

    pub fn digits(self) -> usize {
        match self {
            NumberType::SingleDigit => 1,
            NumberType::DoubleDigit => 2,
            NumberType::TripleDigit => 3,
        }
    }

    /// Largest value representable at this digit length.
    pub fn max_value(self) -> u32 {
        match self {
            NumberType::SingleDigit => 9,
            NumberType::DoubleDigit => 99,
            NumberType::TripleDigit => 999,
        }
    }

    /// Zero-pad `value` to this type's digit length.
    pub fn pad(self, value: u32) -> String {
        format!("{:0width$}", value, width = self.digits())
    }

    /// Sub-type used when a line names no sub-type at all.
    pub fn default_sub_type(self) -> SubType {
        match self {
            NumberType::SingleDigit => SubType::A,
            NumberType::DoubleDigit => SubType::Ab,
            NumberType::TripleDigit => SubType::Super,
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NumberType::SingleDigit => "single digit",
            NumberType::DoubleDigit => "double digit",
            NumberType::TripleDigit => "triple digit",
        };
        f.write_str(s)
    }
}

/// Lottery bet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubType {
    A,
    B,
    C,
    Ab,
    Bc,
    Ac,
    Super,
    Box,
    /// Meta: one SUPER per distinct digit permutation.
    Set,
    /// Meta: one SUPER plus one BOX.
    Both,
    /// Meta: every sub-type of the number's length (1- and 2-digit only).
    All,
}

const SINGLE_SET: [SubType; 3] = [SubType::A, SubType::B, SubType::C];
const DOUBLE_SET: [SubType; 3] = [SubType::Ab, SubType::Bc, SubType::Ac];

impl SubType {
    /// Parse a sub-type word as it appears in pasted text or on a form button.
    ///
    /// Matching is case-insensitive. `ABC` is not a sub-type (it is handled as
    /// legacy shorthand by its own rules) and yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        let sub = match token.trim().to_ascii_lowercase().as_str() {
            "a" => SubType::A,
            "b" => SubType::B,
            "c" => SubType::C,
            "ab" => SubType::Ab,
            "bc" => SubType::Bc,
            "ac" => SubType::Ac,
            "super" | "sup" | "spr" => SubType::Super,
            "box" | "bx" => SubType::Box,
            "set" => SubType::Set,
            "both" => SubType::Both,
            "all" => SubType::All,
            _ => return None,
        };
        Some(sub)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubType::A => "A",
            SubType::B => "B",
            SubType::C => "C",
            SubType::Ab => "AB",
            SubType::Bc => "BC",
            SubType::Ac => "AC",
            SubType::Super => "SUPER",
            SubType::Box => "BOX",
            SubType::Set => "SET",
            SubType::Both => "BOTH",
            SubType::All => "ALL",
        }
    }

    /// True for sub-types that may be stored on an entry.
    pub fn is_concrete(self) -> bool {
        !matches!(self, SubType::Set | SubType::Both | SubType::All)
    }

    /// Whether this sub-type can be booked on a number of type `number_type`.
    pub fn fits(self, number_type: NumberType) -> bool {
        match self {
            SubType::A | SubType::B | SubType::C => number_type == NumberType::SingleDigit,
            SubType::Ab | SubType::Bc | SubType::Ac => number_type == NumberType::DoubleDigit,
            SubType::Super | SubType::Box | SubType::Set | SubType::Both => number_type == NumberType::TripleDigit,
            SubType::All => number_type != NumberType::TripleDigit,
        }
    }

    /// The concrete sub-types `ALL` (and the `ABC` shorthand) fan out to.
    pub fn fan_out(number_type: NumberType) -> Option<&'static [SubType]> {
        match number_type {
            NumberType::SingleDigit => Some(&SINGLE_SET),
            NumberType::DoubleDigit => Some(&DOUBLE_SET),
            NumberType::TripleDigit => None,
        }
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(number, count, sub-type)` triple recognized by a rule, before pricing.
///
/// The sub-type may still be a meta sub-type; expansion resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBooking {
    pub number: String,
    pub count: u32,
    pub sub_type: SubType,
}

impl RawBooking {
    pub fn new(number: impl Into<String>, count: u32, sub_type: SubType) -> Self {
        Self { number: number.into(), count, sub_type }
    }
}

/// One priced line item.
///
/// Only [`crate::EntryFactory`] builds these, so every instance satisfies:
/// concrete sub-type, padded number, `count > 0`, `dealer_amount <= customer_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingEntry {
    pub(crate) number: String,
    pub(crate) count: u32,
    pub(crate) sub_type: SubType,
    pub(crate) number_type: NumberType,
    pub(crate) unit_price: Decimal,
    pub(crate) dealer_amount: Decimal,
    pub(crate) customer_amount: Decimal,
}

impl BookingEntry {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sub_type(&self) -> SubType {
        self.sub_type
    }

    pub fn number_type(&self) -> NumberType {
        self.number_type
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Amount after commission.
    pub fn dealer_amount(&self) -> Decimal {
        self.dealer_amount
    }

    /// `count * unit_price`, before commission.
    pub fn customer_amount(&self) -> Decimal {
        self.customer_amount
    }

    /// The payload item handed to the submission collaborator.
    pub fn to_submission(&self) -> SubmissionItem {
        SubmissionItem {
            number: self.number.clone(),
            count: self.count,
            number_type: self.number_type,
            sub_type: self.sub_type,
        }
    }
}

impl fmt::Display for BookingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} {}", self.number, self.count, self.sub_type)
    }
}

/// Submission payload item. Pricing fields are display-only and not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub number: String,
    pub count: u32,
    #[serde(rename = "type")]
    pub number_type: NumberType,
    pub sub_type: SubType,
}
