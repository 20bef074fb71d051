use crate::api::compiled_rules;
use crate::entry::tests::factory;
use crate::error::RejectionReason;
use crate::{Matcher, ParseOutcome, SubType};

fn outcome(line: &str) -> ParseOutcome {
    let f = factory();
    Matcher::new(compiled_rules(), &f).match_line(line)
}

fn entries(line: &str) -> Vec<(String, u32, SubType)> {
    match outcome(line) {
        ParseOutcome::Parsed(parsed) => {
            parsed.entries.iter().map(|e| (e.number().to_string(), e.count(), e.sub_type())).collect()
        }
        other => panic!("'{line}' did not parse: {other:?}"),
    }
}

fn owned(items: &[(&str, u32, SubType)]) -> Vec<(String, u32, SubType)> {
    items.iter().map(|(n, c, s)| (n.to_string(), *c, *s)).collect()
}

#[test]
fn booking_examples_matching() {
    use SubType::*;

    // Array of (expected entries, input line)
    let cases: Vec<(Vec<(&str, u32, SubType)>, &str)> = vec![
        (vec![("123", 5, Box)], "123=5=box"),
        (vec![("123", 5, Box)], "123 = 5 = BOX"),
        (vec![("43", 15, Bc)], "bc:43:15"),
        (vec![("15", 10, Ab)], "AB,15,10"),
        (vec![("123", 5, Super)], "sup-123-5"),
        (vec![("112", 5, Super), ("121", 5, Super), ("211", 5, Super)], "112 5 set"),
        (vec![("123", 5, Super), ("123", 5, Box)], "123=5=both"),
        (vec![("45", 10, Ab)], "45-10-ab"),
        (vec![("12", 5, Ab), ("12", 5, Bc), ("12", 5, Ac)], "12=5all"),
        (vec![("0", 5, A), ("0", 5, B), ("0", 5, C)], "Abc 0 5"),
        (vec![("8", 5, A), ("8", 5, B), ("8", 5, C)], "Abc-8-5"),
        (vec![("6", 25, A), ("6", 25, B), ("6", 25, C)], "Abc=6=25"),
        (vec![("12", 10, Ab), ("12", 10, Bc), ("12", 10, Ac)], "abc12/10"),
        (vec![("12", 5, Ab), ("12", 5, Bc), ("12", 5, Ac)], "12 5 abc"),
        (vec![("12", 5, Ab)], "12  5"),
        (vec![("12", 5, Ab)], "12\t\t5"),
        (vec![("123", 5, Super)], "123 5"),
        (vec![("12", 5, Ab)], "12,,5"),
        (vec![("12", 5, Ab)], "12.5"),
        (vec![("12", 5, Ab)], "12..5"),
        (vec![("123", 5, Super)], "123*5"),
        (vec![("7", 10, A)], "7=10"),
        (vec![("45", 20, Ab)], "45/20"),
        (vec![("3", 5, A)], "3#5"),
        (vec![("8", 10, A)], "8&10"),
        (vec![("123", 5, Super), ("123", 3, Box)], "123-5-3"),
        (vec![("100", 2, Super), ("100", 2, Box)], "100.2.2"),
        (vec![("123", 5, Super), ("123", 3, Box)], "123 5 3"),
        (vec![("12", 5, Ab), ("12", 3, Ab)], "12.5.3"),
        (vec![("709", 5, Super), ("077", 6, Super), ("078", 5, Super)], "709-5,077-6,078-5"),
        (vec![("56", 5, Ac)], "56 AC=5"),
        (vec![("123", 5, Box)], "123 box 5"),
        (vec![("45", 10, Bc)], "45 bc 10"),
        (vec![("8", 20, A)], "A 8 20"),
        (vec![("43", 15, Bc)], "bc 43 15"),
        (vec![("123", 5, Box)], "box 123=5"),
        (vec![("123", 5, Box)], "[16/10/26, 9:15:02 PM] Ravi: 123=5=box"),
        (vec![("45", 20, Ab)], "16/10/2026, 21:15 - Ravi: 45/20"),
    ];

    for (expected, input) in cases {
        assert_eq!(entries(input), owned(&expected), "input: {input}");
    }
}

#[test]
fn winning_rule_names() {
    // Array of (rule name, input line)
    let cases: Vec<(&str, &str)> = vec![
        ("sub-type number count", "bc:43:15"),
        ("number count sub-type", "123=5=box"),
        ("abc number count", "Abc 0 5"),
        ("number count abc", "12 5 abc"),
        ("number count (wide space)", "12  5"),
        ("3-digit count (single space)", "123 5"),
        ("number count (double comma)", "12,,5"),
        ("number count (symbol)", "12..5"),
        ("number count count", "100.2.2"),
        ("comma separated bookings", "709-5,077-6,078-5"),
        ("number sub-type count", "56 AC=5"),
        ("sub-type number count (spaced)", "A 8 20"),
    ];

    for (rule, input) in cases {
        match outcome(input) {
            ParseOutcome::Parsed(parsed) => assert_eq!(parsed.rule, rule, "input: {input}"),
            other => panic!("'{input}' did not parse: {other:?}"),
        }
    }
}

#[test]
fn ignored_lines() {
    let cases = vec!["Dear 6", "good morning 2", "Thanks 10!", "[16/10/26, 9:15:02 PM] Ravi:"];
    for input in cases {
        assert_eq!(outcome(input), ParseOutcome::Ignored, "input: {input}");
    }
}

#[test]
fn unrecognized_lines_fail_verbatim() {
    let cases = vec!["garbage !! 9x9", "12 5", "1234=5", "hello world", "A 5"];
    for input in cases {
        match outcome(input) {
            ParseOutcome::Failed(failed) => assert_eq!(failed.line, input),
            other => panic!("'{input}' should fail: {other:?}"),
        }
    }
}

#[test]
fn failed_line_keeps_chat_prefix() {
    let line = "[16/10/26, 9:15:02 PM] Ravi: see you later";
    match outcome(line) {
        ParseOutcome::Failed(failed) => assert_eq!(failed.line, line),
        other => panic!("should fail: {other:?}"),
    }
}

#[test]
fn semantic_rejections_fail_the_line() {
    // Array of (rejection, input line)
    let cases: Vec<(RejectionReason, &str)> = vec![
        (RejectionReason::SingleDigitMinimum { count: 3, minimum: 5 }, "5.3"),
        (RejectionReason::BoxRequiresThreeDigits("12".into()), "12=5=box"),
        (RejectionReason::ZeroCount, "123 0"),
        (RejectionReason::SubTypeMismatch { sub_type: SubType::All, number_type: crate::NumberType::TripleDigit }, "abc 123 5"),
        (
            RejectionReason::SubTypeMismatch { sub_type: SubType::Ab, number_type: crate::NumberType::TripleDigit },
            "ab:123:5",
        ),
    ];

    for (reason, input) in cases {
        match outcome(input) {
            ParseOutcome::Failed(failed) => {
                assert_eq!(failed.reason, Some(reason), "input: {input}");
                assert!(failed.rule.is_some(), "input: {input}");
            }
            other => panic!("'{input}' should fail: {other:?}"),
        }
    }
}

#[test]
fn comma_line_survives_bad_groups() {
    match outcome("709-5,zzz,078-5") {
        ParseOutcome::Parsed(parsed) => {
            assert_eq!(parsed.entries.len(), 2);
            assert_eq!(parsed.dropped_groups, vec!["zzz".to_string()]);
        }
        other => panic!("should parse: {other:?}"),
    }

    match outcome("abc,1x2") {
        ParseOutcome::Failed(failed) => assert_eq!(failed.rule, Some("comma separated bookings")),
        other => panic!("should fail: {other:?}"),
    }
}

#[test]
fn retry_rule_only_fires_on_abc_shape() {
    let f = factory();
    let matcher = Matcher::new(compiled_rules(), &f).with_retry(crate::api::retry_rule());

    let parsed = matcher.retry_line("Ravi: abc 5 10").map(|p| p.entries.len());
    assert_eq!(parsed, Some(3));
    let parsed = matcher.retry_line("Ravi: abc:5:10").map(|p| p.entries.len());
    assert_eq!(parsed, Some(3));
    let parsed = matcher.retry_line("21:15 Ravi: abc-12-5").map(|p| p.entries.len());
    assert_eq!(parsed, Some(3));
    assert!(matcher.retry_line("Ravi: hello 5 10").is_none());
    assert!(Matcher::new(compiled_rules(), &f).retry_line("abc 5 10").is_none());
}
