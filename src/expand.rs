//! Expansion strategies.
//!
//! Every strategy resolves one instruction into zero or more Entry Factory
//! calls. The per-value policy is shared by all of them:
//!
//! ```text
//! sub-type   -> entries for one number
//! ---------------------------------------------------------------
//! ALL        -> A,B,C  or  AB,BC,AC           (same count)
//! BOTH       -> SUPER(count) + BOX(box_count, else count)
//! SET        -> SUPER(count) per distinct digit permutation
//! other      -> one entry
//! ```
//!
//! The box count only ever feeds BOX (alone or as the BOX half of BOTH).
//! Every other sub-type books `count` as given, so a zero count is rejected.
//! A Range value is skipped only when both counts are zero.

use crate::booking::{BookingEntry, NumberType, RawBooking, SubType};
use crate::entry::EntryFactory;
use crate::error::RejectionReason;
use std::collections::BTreeSet;

/// A validated base instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// One number.
    Single { number: String, count: u32, box_count: u32, sub_type: SubType },
    /// Every value in `[start, end]`.
    Range { start: String, end: String, count: u32, box_count: u32, sub_type: SubType },
    /// `start, start + step, ...` while `<= end`. 3-digit only.
    Different { start: String, end: String, step: u32, count: u32, box_count: u32, sub_type: SubType },
}

impl From<&RawBooking> for Instruction {
    fn from(raw: &RawBooking) -> Self {
        Instruction::Single { number: raw.number.clone(), count: raw.count, box_count: 0, sub_type: raw.sub_type }
    }
}

/// Entries produced by one instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub entries: Vec<BookingEntry>,
    /// Range values dropped because both counts were zero.
    pub skipped: Vec<String>,
}

impl Expansion {
    /// A valid instruction that produced nothing.
    pub fn is_noop(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run `instruction` through the matching strategy.
pub fn expand(factory: &EntryFactory, instruction: &Instruction) -> Result<Expansion, RejectionReason> {
    match instruction {
        Instruction::Single { number, count, box_count, sub_type } => {
            let number_type = classify(number)?;
            let entries = expand_value(factory, number, number_type, *count, *box_count, *sub_type)?;
            Ok(Expansion { entries, skipped: Vec::new() })
        }
        Instruction::Range { start, end, count, box_count, sub_type } => {
            let (number_type, lo, hi) = bounds(start, end)?;
            let mut out = Expansion::default();
            for value in lo..=hi {
                let number = number_type.pad(value);
                if *count == 0 && *box_count == 0 {
                    out.skipped.push(number);
                    continue;
                }
                out.entries.extend(expand_value(factory, &number, number_type, *count, *box_count, *sub_type)?);
            }
            Ok(out)
        }
        Instruction::Different { start, end, step, count, box_count, sub_type } => {
            let (number_type, lo, hi) = bounds(start, end)?;
            if number_type != NumberType::TripleDigit {
                return Err(RejectionReason::LengthMismatch { number: start.clone(), len: start.len(), expected: 3 });
            }
            if *step == 0 {
                return Err(RejectionReason::ZeroStep);
            }
            let mut out = Expansion::default();
            if hi - lo < *step {
                return Ok(out);
            }
            let mut value = lo;
            while value <= hi {
                let number = number_type.pad(value);
                out.entries.extend(expand_value(factory, &number, number_type, *count, *box_count, *sub_type)?);
                value += step;
            }
            Ok(out)
        }
    }
}

/// Expand a recognized free-text triple (no box count).
pub fn expand_raw(factory: &EntryFactory, raw: &RawBooking) -> Result<Vec<BookingEntry>, RejectionReason> {
    expand(factory, &Instruction::from(raw)).map(|e| e.entries)
}

/// Apply the ALL / BOTH / SET / single policy to one number.
fn expand_value(
    factory: &EntryFactory,
    number: &str,
    number_type: NumberType,
    count: u32,
    box_count: u32,
    sub_type: SubType,
) -> Result<Vec<BookingEntry>, RejectionReason> {
    match sub_type {
        SubType::All => {
            let members = SubType::fan_out(number_type)
                .ok_or(RejectionReason::SubTypeMismatch { sub_type: SubType::All, number_type })?;
            members.iter().map(|&member| factory.create_entry(number, count, member, number_type)).collect()
        }
        SubType::Both => {
            if number_type != NumberType::TripleDigit {
                return Err(RejectionReason::SubTypeMismatch { sub_type, number_type });
            }
            let mut entries = Vec::with_capacity(2);
            if count > 0 {
                entries.push(factory.create_entry(number, count, SubType::Super, number_type)?);
            }
            let boxed = if box_count > 0 { box_count } else { count };
            entries.push(factory.create_entry(number, boxed, SubType::Box, number_type)?);
            Ok(entries)
        }
        SubType::Set => {
            if number_type != NumberType::TripleDigit {
                return Err(RejectionReason::SubTypeMismatch { sub_type, number_type });
            }
            permutations(number)
                .iter()
                .map(|perm| factory.create_entry(perm, count, SubType::Super, number_type))
                .collect()
        }
        SubType::Box => {
            let boxed = if box_count > 0 { box_count } else { count };
            Ok(vec![factory.create_entry(number, boxed, SubType::Box, number_type)?])
        }
        concrete => Ok(vec![factory.create_entry(number, count, concrete, number_type)?]),
    }
}

/// Distinct digit permutations in ascending order; repeated digits collapse.
pub fn permutations(number: &str) -> BTreeSet<String> {
    let digits: Vec<char> = number.chars().collect();
    let mut out = BTreeSet::new();
    permute(&digits, &mut Vec::with_capacity(digits.len()), &mut vec![false; digits.len()], &mut out);
    out
}

fn permute(digits: &[char], current: &mut Vec<char>, used: &mut [bool], out: &mut BTreeSet<String>) {
    if current.len() == digits.len() {
        out.insert(current.iter().collect());
        return;
    }
    for i in 0..digits.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(digits[i]);
        permute(digits, current, used, out);
        current.pop();
        used[i] = false;
    }
}

fn classify(number: &str) -> Result<NumberType, RejectionReason> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectionReason::NotDigits(number.to_string()));
    }
    NumberType::from_len(number.len()).ok_or_else(|| RejectionReason::UnsupportedLength(number.to_string()))
}

fn bounds(start: &str, end: &str) -> Result<(NumberType, u32, u32), RejectionReason> {
    let number_type = classify(start)?;
    classify(end)?;
    if start.len() != end.len() {
        return Err(RejectionReason::RangeLengthMismatch { start: start.to_string(), end: end.to_string() });
    }
    // At most three ASCII digits, so these cannot fail.
    let lo: u32 = start.parse().map_err(|_| RejectionReason::NotDigits(start.to_string()))?;
    let hi: u32 = end.parse().map_err(|_| RejectionReason::NotDigits(end.to_string()))?;
    if lo > hi {
        return Err(RejectionReason::RangeOrder { start: start.to_string(), end: end.to_string() });
    }
    Ok((number_type, lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::tests::factory;

    fn numbers(expansion: &Expansion) -> Vec<(&str, u32, SubType)> {
        expansion.entries.iter().map(|e| (e.number(), e.count(), e.sub_type())).collect()
    }

    fn single(number: &str, count: u32, box_count: u32, sub_type: SubType) -> Instruction {
        Instruction::Single { number: number.into(), count, box_count, sub_type }
    }

    #[test]
    fn range_is_inclusive_and_zero_padded() {
        let out = expand(
            &factory(),
            &Instruction::Range {
                start: "048".into(),
                end: "050".into(),
                count: 5,
                box_count: 0,
                sub_type: SubType::Super,
            },
        )
        .unwrap();
        assert_eq!(
            numbers(&out),
            vec![("048", 5, SubType::Super), ("049", 5, SubType::Super), ("050", 5, SubType::Super)]
        );
    }

    #[test]
    fn range_skips_values_without_any_count() {
        let out = expand(
            &factory(),
            &Instruction::Range { start: "10".into(), end: "12".into(), count: 0, box_count: 0, sub_type: SubType::Ab },
        )
        .unwrap();
        assert!(out.is_noop());
        assert_eq!(out.skipped, vec!["10", "11", "12"]);
    }

    #[test]
    fn range_rejects_reversed_or_mixed_bounds() {
        let f = factory();
        let reversed =
            Instruction::Range { start: "050".into(), end: "048".into(), count: 5, box_count: 0, sub_type: SubType::Super };
        assert!(matches!(expand(&f, &reversed), Err(RejectionReason::RangeOrder { .. })));

        let mixed =
            Instruction::Range { start: "48".into(), end: "050".into(), count: 5, box_count: 0, sub_type: SubType::Super };
        assert!(matches!(expand(&f, &mixed), Err(RejectionReason::RangeLengthMismatch { .. })));
    }

    #[test]
    fn range_with_both_uses_box_count() {
        let out = expand(
            &factory(),
            &Instruction::Range { start: "100".into(), end: "101".into(), count: 5, box_count: 3, sub_type: SubType::Both },
        )
        .unwrap();
        assert_eq!(
            numbers(&out),
            vec![
                ("100", 5, SubType::Super),
                ("100", 3, SubType::Box),
                ("101", 5, SubType::Super),
                ("101", 3, SubType::Box)
            ]
        );
    }

    #[test]
    fn different_includes_end_on_exact_multiple() {
        let out = expand(
            &factory(),
            &Instruction::Different {
                start: "100".into(),
                end: "130".into(),
                step: 10,
                count: 5,
                box_count: 0,
                sub_type: SubType::Super,
            },
        )
        .unwrap();
        let got: Vec<&str> = out.entries.iter().map(|e| e.number()).collect();
        assert_eq!(got, vec!["100", "110", "120", "130"]);
    }

    #[test]
    fn different_stops_before_overshooting() {
        let out = expand(
            &factory(),
            &Instruction::Different {
                start: "100".into(),
                end: "125".into(),
                step: 10,
                count: 5,
                box_count: 0,
                sub_type: SubType::Box,
            },
        )
        .unwrap();
        let got: Vec<&str> = out.entries.iter().map(|e| e.number()).collect();
        assert_eq!(got, vec!["100", "110", "120"]);
    }

    #[test]
    fn different_with_step_wider_than_span_is_a_noop() {
        let out = expand(
            &factory(),
            &Instruction::Different {
                start: "100".into(),
                end: "105".into(),
                step: 10,
                count: 5,
                box_count: 0,
                sub_type: SubType::Super,
            },
        )
        .unwrap();
        assert!(out.is_noop());
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn different_requires_three_digits_and_positive_step() {
        let f = factory();
        let short = Instruction::Different {
            start: "10".into(),
            end: "50".into(),
            step: 10,
            count: 5,
            box_count: 0,
            sub_type: SubType::Ab,
        };
        assert!(matches!(expand(&f, &short), Err(RejectionReason::LengthMismatch { expected: 3, .. })));

        let zero = Instruction::Different {
            start: "100".into(),
            end: "150".into(),
            step: 0,
            count: 5,
            box_count: 0,
            sub_type: SubType::Super,
        };
        assert_eq!(expand(&f, &zero), Err(RejectionReason::ZeroStep));
    }

    #[test]
    fn set_collapses_repeated_digits() {
        let out = expand(&factory(), &single("112", 4, 0, SubType::Set)).unwrap();
        assert_eq!(
            numbers(&out),
            vec![("112", 4, SubType::Super), ("121", 4, SubType::Super), ("211", 4, SubType::Super)]
        );
        assert_eq!(permutations("123").len(), 6);
        assert_eq!(permutations("777").len(), 1);
    }

    #[test]
    fn all_fans_out_by_length() {
        let out = expand(&factory(), &single("34", 10, 0, SubType::All)).unwrap();
        assert_eq!(numbers(&out), vec![("34", 10, SubType::Ab), ("34", 10, SubType::Bc), ("34", 10, SubType::Ac)]);

        let out = expand(&factory(), &single("3", 5, 0, SubType::All)).unwrap();
        assert_eq!(numbers(&out), vec![("3", 5, SubType::A), ("3", 5, SubType::B), ("3", 5, SubType::C)]);

        assert!(matches!(
            expand(&factory(), &single("345", 5, 0, SubType::All)),
            Err(RejectionReason::SubTypeMismatch { .. })
        ));
    }

    #[test]
    fn zero_count_is_rejected_outside_box() {
        let f = factory();
        for (number, sub_type) in [("123", SubType::Super), ("34", SubType::All), ("123", SubType::Set), ("7", SubType::A)] {
            assert_eq!(expand(&f, &single(number, 0, 5, sub_type)), Err(RejectionReason::ZeroCount), "{number} {sub_type}");
        }

        let out = expand(&f, &single("123", 0, 5, SubType::Box)).unwrap();
        assert_eq!(numbers(&out), vec![("123", 5, SubType::Box)]);

        let out = expand(&f, &single("123", 0, 5, SubType::Both)).unwrap();
        assert_eq!(numbers(&out), vec![("123", 5, SubType::Box)]);
    }

    #[test]
    fn range_with_only_box_count_books_box_half() {
        let f = factory();
        let both =
            Instruction::Range { start: "100".into(), end: "101".into(), count: 0, box_count: 3, sub_type: SubType::Both };
        let out = expand(&f, &both).unwrap();
        assert_eq!(numbers(&out), vec![("100", 3, SubType::Box), ("101", 3, SubType::Box)]);

        let super_only =
            Instruction::Range { start: "100".into(), end: "101".into(), count: 0, box_count: 3, sub_type: SubType::Super };
        assert_eq!(expand(&f, &super_only), Err(RejectionReason::ZeroCount));
    }

    #[test]
    fn range_applies_all_and_set_per_value() {
        let f = factory();
        let all = Instruction::Range { start: "10".into(), end: "11".into(), count: 5, box_count: 0, sub_type: SubType::All };
        let out = expand(&f, &all).unwrap();
        assert_eq!(
            numbers(&out),
            vec![
                ("10", 5, SubType::Ab),
                ("10", 5, SubType::Bc),
                ("10", 5, SubType::Ac),
                ("11", 5, SubType::Ab),
                ("11", 5, SubType::Bc),
                ("11", 5, SubType::Ac)
            ]
        );

        let set = Instruction::Range { start: "111".into(), end: "112".into(), count: 2, box_count: 0, sub_type: SubType::Set };
        let out = expand(&f, &set).unwrap();
        assert_eq!(
            numbers(&out),
            vec![("111", 2, SubType::Super), ("112", 2, SubType::Super), ("121", 2, SubType::Super), ("211", 2, SubType::Super)]
        );
    }

    #[test]
    fn both_falls_back_to_count_for_box_half() {
        let out = expand(&factory(), &single("123", 5, 0, SubType::Both)).unwrap();
        assert_eq!(numbers(&out), vec![("123", 5, SubType::Super), ("123", 5, SubType::Box)]);

        let out = expand(&factory(), &single("123", 5, 2, SubType::Both)).unwrap();
        assert_eq!(numbers(&out), vec![("123", 5, SubType::Super), ("123", 2, SubType::Box)]);
    }
}
