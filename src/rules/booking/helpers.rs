use crate::booking::{NumberType, RawBooking, SubType};
use crate::Groups;

/// A 1-3 digit number from group `idx`, as written (leading zeros kept).
pub fn number(groups: &Groups, idx: usize) -> Option<String> {
    let n = groups.get(idx)?;
    NumberType::of(n).map(|_| n.to_string())
}

/// A count from group `idx`. Zero is returned as is; validation rejects it later.
pub fn count(groups: &Groups, idx: usize) -> Option<u32> {
    groups.get(idx)?.parse().ok()
}

/// A sub-type word from group `idx`.
pub fn sub_type(groups: &Groups, idx: usize) -> Option<SubType> {
    SubType::from_token(groups.get(idx)?)
}

/// One `(number, count, sub-type)` triple from the usual group layout.
pub fn triple(groups: &Groups, number_idx: usize, count_idx: usize, sub_idx: usize) -> Option<Vec<RawBooking>> {
    Some(vec![RawBooking::new(number(groups, number_idx)?, count(groups, count_idx)?, sub_type(groups, sub_idx)?)])
}

/// A number and count with the sub-type implied by the number's length.
pub fn bare(groups: &Groups, number_idx: usize, count_idx: usize) -> Option<Vec<RawBooking>> {
    let number = number(groups, number_idx)?;
    let sub_type = NumberType::of(&number)?.default_sub_type();
    Some(vec![RawBooking::new(number, count(groups, count_idx)?, sub_type)])
}

/// Legacy `ABC` shorthand: every sub-type of the number's length.
///
/// Emitted as `ALL`; a 3-digit number therefore fails validation.
pub fn abc(groups: &Groups, number_idx: usize, count_idx: usize) -> Option<Vec<RawBooking>> {
    Some(vec![RawBooking::new(number(groups, number_idx)?, count(groups, count_idx)?, SubType::All)])
}

/// Two counts for one number: SUPER then BOX on 3 digits, otherwise the
/// default sub-type booked twice.
pub fn dual(groups: &Groups, number_idx: usize, first_idx: usize, second_idx: usize) -> Option<Vec<RawBooking>> {
    let number = number(groups, number_idx)?;
    let number_type = NumberType::of(&number)?;
    let first = count(groups, first_idx)?;
    let second = count(groups, second_idx)?;
    let (first_sub, second_sub) = match number_type {
        NumberType::TripleDigit => (SubType::Super, SubType::Box),
        other => (other.default_sub_type(), other.default_sub_type()),
    };
    Some(vec![RawBooking::new(number.clone(), first, first_sub), RawBooking::new(number, second, second_sub)])
}
