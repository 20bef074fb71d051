//! Trigger scanning (line pre-classification).
//!
//! A cheap pass over one line that sets the coarse buckets used to gate rules.
//! False positives are fine: the rule's regex still has to match. False
//! negatives are not, so every bucket is a plain character test.

use super::compiled_rules::BucketMask;

const SYMBOLS: &[char] = &['=', '+', '-', ':', '/', '.', '#', '&', '*'];

/// Line characteristics detected from the prefix-stripped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerInfo {
    pub buckets: BucketMask,
}

impl TriggerInfo {
    pub fn scan(line: &str) -> Self {
        let mut buckets = BucketMask::empty();
        for c in line.chars() {
            if c.is_ascii_digit() {
                buckets |= BucketMask::HAS_DIGITS;
            } else if c.is_alphabetic() {
                buckets |= BucketMask::HAS_ALPHA;
            } else if c == ',' {
                buckets |= BucketMask::HAS_COMMA;
            } else if c.is_whitespace() {
                buckets |= BucketMask::HAS_SPACE;
            } else if SYMBOLS.contains(&c) {
                buckets |= BucketMask::HAS_SYMBOL;
            }
        }
        TriggerInfo { buckets }
    }
}
