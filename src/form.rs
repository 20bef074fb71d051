//! Structured-Input Normalizer.
//!
//! Converts the booking form's current selections into expansion
//! instructions. Validation is synchronous and all-or-nothing: one bad token
//! in a multi-number field rejects the whole field.

use crate::booking::{NumberType, SubType};
use crate::entry::EntryFactory;
use crate::error::FormError;
use crate::expand::{Expansion, Instruction, expand};
use tracing::debug;

/// How the number fields are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMode {
    /// One or more numbers in the number field.
    #[default]
    Standard,
    /// `number ..= range_end`.
    Range,
    /// `number, number + difference, ... <= range_end` (3-digit only).
    Different,
}

impl EntryMode {
    fn label(self) -> &'static str {
        match self {
            EntryMode::Standard => "standard",
            EntryMode::Range => "range",
            EntryMode::Different => "different",
        }
    }
}

/// Raw form state. Numeric fields are text, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub digit_mode: NumberType,
    pub mode: EntryMode,
    pub sub_type: SubType,
    pub number: String,
    pub range_end: String,
    pub difference: String,
    pub count: String,
    pub box_count: String,
}

impl FormInput {
    pub fn new(digit_mode: NumberType, sub_type: SubType) -> Self {
        Self {
            digit_mode,
            mode: EntryMode::Standard,
            sub_type,
            number: String::new(),
            range_end: String::new(),
            difference: String::new(),
            count: String::new(),
            box_count: String::new(),
        }
    }
}

/// Validate the form and turn it into instructions.
pub fn normalize(input: &FormInput) -> Result<Vec<Instruction>, FormError> {
    let count = parse_count(&input.count)?;
    let box_count = parse_count(&input.box_count)?;
    let tokens = number_tokens(&input.number);
    if tokens.is_empty() {
        return Err(FormError::EmptyNumber);
    }

    let single_only = input.mode != EntryMode::Standard || input.sub_type == SubType::Set;
    if single_only && tokens.len() > 1 {
        let label = if input.sub_type == SubType::Set && input.mode == EntryMode::Standard {
            "set"
        } else {
            input.mode.label()
        };
        return Err(FormError::MultipleNumbersNotAllowed(label));
    }

    let sub_type = input.sub_type;
    match input.mode {
        EntryMode::Standard => {
            check_tokens(input.digit_mode, &tokens)?;
            Ok(tokens
                .into_iter()
                .map(|number| Instruction::Single { number: number.to_string(), count, box_count, sub_type })
                .collect())
        }
        EntryMode::Range => {
            let end = input.range_end.trim();
            if end.is_empty() {
                return Err(FormError::MissingRangeEnd);
            }
            check_tokens(input.digit_mode, &[tokens[0], end])?;
            Ok(vec![Instruction::Range {
                start: tokens[0].to_string(),
                end: end.to_string(),
                count,
                box_count,
                sub_type,
            }])
        }
        EntryMode::Different => {
            let end = input.range_end.trim();
            if end.is_empty() {
                return Err(FormError::MissingRangeEnd);
            }
            let difference = input.difference.trim();
            if difference.is_empty() {
                return Err(FormError::MissingDifference);
            }
            let step = parse_count(difference)?;
            check_tokens(input.digit_mode, &[tokens[0], end])?;
            Ok(vec![Instruction::Different {
                start: tokens[0].to_string(),
                end: end.to_string(),
                step,
                count,
                box_count,
                sub_type,
            }])
        }
    }
}

/// Normalize and expand the form. Any rejected number rejects the batch.
pub fn apply(factory: &EntryFactory, input: &FormInput) -> Result<Expansion, FormError> {
    let mut out = Expansion::default();
    for instruction in normalize(input)? {
        let expansion = expand(factory, &instruction)?;
        out.entries.extend(expansion.entries);
        out.skipped.extend(expansion.skipped);
    }
    debug!(mode = input.mode.label(), entries = out.entries.len(), skipped = out.skipped.len(), "form applied");
    Ok(out)
}

fn number_tokens(field: &str) -> Vec<&str> {
    field.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()).collect()
}

fn check_tokens(digit_mode: NumberType, tokens: &[&str]) -> Result<(), FormError> {
    let invalid: Vec<String> = tokens
        .iter()
        .filter(|t| t.len() != digit_mode.digits() || !t.bytes().all(|b| b.is_ascii_digit()))
        .map(|t| t.to_string())
        .collect();
    if invalid.is_empty() { Ok(()) } else { Err(FormError::InvalidNumbers(invalid)) }
}

fn parse_count(field: &str) -> Result<u32, FormError> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(0);
    }
    field.parse::<u32>().map_err(|_| FormError::InvalidCount(field.to_string()))
}
