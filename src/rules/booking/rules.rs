//! The booking rule table.
//!
//! Order is priority: the matcher walks [`get`] top to bottom and the first
//! rule whose pattern matches the whole line decides it. Most specific shapes
//! (explicit sub-types) come first, bare number/count shapes after, and the
//! loose hybrids last.
//!
//! Separator vocabulary shared by the patterns:
//!
//! ```text
//! symbols   = + - : / . # & *
//! sub-types super|sup|spr  box|bx  set  both  all  ab bc ac  a b c
//! ```

use crate::engine::BucketMask;
use crate::rules::booking::helpers::{abc, bare, dual, triple};
use crate::{RawBooking, Rule};

const DIGITS: u32 = BucketMask::HAS_DIGITS.bits();
const ALPHA: u32 = BucketMask::HAS_ALPHA.bits();
const COMMA: u32 = BucketMask::HAS_COMMA.bits();
const SYMBOL: u32 = BucketMask::HAS_SYMBOL.bits();
const SPACE: u32 = BucketMask::HAS_SPACE.bits();

/// `bc:43:15`, `AB,15,10`, `box-123-5`
fn rule_sub_type_first() -> Rule {
    rule! {
        name: "sub-type number count",
        pattern: re!(r"(?i)^(super|sup|spr|box|bx|set|both|all|ab|bc|ac|a|b|c)\s*[=+\-:/.,#&*]+\s*(\d{1,3})\s*[=+\-:/.,#&*]+\s*(\d+)$"),
        buckets: DIGITS | ALPHA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { triple(groups, 2, 3, 1) },
    }
}

/// `123=5=box`, `123 5 set`, `45-10-ab`, `12=5all`
fn rule_sub_type_last() -> Rule {
    rule! {
        name: "number count sub-type",
        pattern: re!(r"(?i)^(\d{1,3})\s*(?:[=+\-:/.,#&*]+|\s)\s*(\d+)\s*[=+\-:/.,#&*]*\s*(super|sup|spr|box|bx|set|both|all|ab|bc|ac|a|b|c)$"),
        buckets: DIGITS | ALPHA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { triple(groups, 1, 2, 3) },
    }
}

/// `Abc 0 5`, `Abc-8-5`, `Abc=6=25`, `abc12/10`
fn rule_abc_first() -> Rule {
    rule! {
        name: "abc number count",
        pattern: re!(r"(?i)^abc[\W_]*?(\d{1,3})[\W_]+(\d+)[\W_]*$"),
        buckets: DIGITS | ALPHA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { abc(groups, 1, 2) },
    }
}

/// `5 10 abc`, `12=5=Abc`
fn rule_abc_last() -> Rule {
    rule! {
        name: "number count abc",
        pattern: re!(r"(?i)^(\d{1,3})[\W_]+(\d+)[\W_]*abc$"),
        buckets: DIGITS | ALPHA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { abc(groups, 1, 2) },
    }
}

/// `12  5` (two or more spaces or tabs)
fn rule_bare_wide_space() -> Rule {
    rule! {
        name: "number count (wide space)",
        pattern: re!(r"^(\d{1,3})[ \t]{2,}(\d+)$"),
        buckets: DIGITS | SPACE,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { bare(groups, 1, 2) },
    }
}

/// `123 5`; a single space is only trusted after three digits.
fn rule_bare_triple_space() -> Rule {
    rule! {
        name: "3-digit count (single space)",
        pattern: re!(r"^(\d{3})\s(\d+)$"),
        buckets: DIGITS | SPACE,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { bare(groups, 1, 2) },
    }
}

/// `12,,5`
fn rule_bare_double_comma() -> Rule {
    rule! {
        name: "number count (double comma)",
        pattern: re!(r"^(\d{1,3})\s*,,\s*(\d+)$"),
        buckets: DIGITS | COMMA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { bare(groups, 1, 2) },
    }
}

/// `12.5`, `12..5`, `123*5`, `7=10`, `45/20`, `3#5`, `8&10`
fn rule_bare_symbol() -> Rule {
    rule! {
        name: "number count (symbol)",
        pattern: re!(r"^(\d{1,3})\s*[=+\-:/.#&*]{1,2}\s*(\d+)$"),
        buckets: DIGITS | SYMBOL,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { bare(groups, 1, 2) },
    }
}

/// `123-5-3`, `100.2.2`, `123 5 3`
fn rule_dual_count() -> Rule {
    rule! {
        name: "number count count",
        pattern: re!(r"^(\d{1,3})\s*(?:[=+\-:/.#&*]+|\s+)\s*(\d+)\s*(?:[=+\-:/.#&*]+|\s+)\s*(\d+)$"),
        buckets: DIGITS,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { dual(groups, 1, 2, 3) },
    }
}

/// `709-5,077-6,078-5`: every comma group is matched on its own.
fn rule_comma_groups() -> Rule {
    rule! {
        name: "comma separated bookings",
        pattern: split!(r"^[^,]*(?:,[^,]*)+$", ','),
        buckets: DIGITS | COMMA,
    }
}

/// `56 AC=5`, `123 box 5`, `45 bc 10`
fn rule_number_sub_type_count() -> Rule {
    rule! {
        name: "number sub-type count",
        pattern: re!(r"(?i)^(\d{1,3})[\s=+\-:/.#&*]*(super|sup|spr|box|bx|set|both|all|ab|bc|ac|a|b|c)[\s=+\-:/.#&*]+(\d+)$"),
        buckets: DIGITS | ALPHA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { triple(groups, 1, 3, 2) },
    }
}

/// `A 8 20`, `bc 43 15`, `box 123=5`
fn rule_spaced_sub_type_first() -> Rule {
    rule! {
        name: "sub-type number count (spaced)",
        pattern: re!(r"(?i)^(super|sup|spr|box|bx|set|both|all|ab|bc|ac|a|b|c)\s+(\d{1,3})[\s=+\-:/.#&*]+(\d+)$"),
        buckets: DIGITS | ALPHA | SPACE,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { triple(groups, 2, 3, 1) },
    }
}

/// Narrow `ABC` shape retried on lines the table missed.
///
/// Candidates are the stripped message, the original line and, when neither
/// matches, the text after the last `:` (an unrecognized sender prefix).
pub fn abc_retry() -> Rule {
    rule! {
        name: "abc retry",
        pattern: re!(r"(?i)^abc\s*[=\-:.\s]\s*(\d{1,2})\s*[=\-:.\s]\s*(\d+)$"),
        buckets: DIGITS | ALPHA,
        prod: |groups: &Groups| -> Option<Vec<RawBooking>> { abc(groups, 1, 2) },
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_sub_type_first(),
        rule_sub_type_last(),
        rule_abc_first(),
        rule_abc_last(),
        rule_bare_wide_space(),
        rule_bare_triple_space(),
        rule_bare_double_comma(),
        rule_bare_symbol(),
        rule_dual_count(),
        rule_comma_groups(),
        rule_number_sub_type_count(),
        rule_spaced_sub_type_first(),
    ]
}
