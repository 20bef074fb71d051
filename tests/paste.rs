use bookslip::{
    Context, Disposition, EntryFactory, NumberType, Options, ParseOutcome, ParseSession, PriceConfig, Rounding, SubType,
    parse_verbose_with, parse_with,
};
use rust_decimal_macros::dec;

fn pricing() -> PriceConfig {
    PriceConfig {
        single_digit_number_price: dec!(12),
        non_single_digit_price: dec!(10),
        commission: dec!(46),
        single_digit_number_commission: dec!(0.5),
    }
}

fn context() -> Context {
    Context::new(pricing())
}

const CHAT: &str = "\
[16/10/26, 9:15:02 PM] Ravi: good morning 2
[16/10/26, 9:15:40 PM] Ravi: 123=5=box
bc:43:15
709-5,077-6,078-5

Dear 6
garbage !! 9x9
[16/10/26, 9:16:03 PM] Ravi:
Abc 0 5
";

#[test]
fn chat_block_end_to_end() {
    let res = parse_with(CHAT, &context(), &Options::default());

    let got: Vec<(&str, u32, SubType)> = res.entries.iter().map(|e| (e.number(), e.count(), e.sub_type())).collect();
    assert_eq!(
        got,
        vec![
            ("123", 5, SubType::Box),
            ("43", 15, SubType::Bc),
            ("709", 5, SubType::Super),
            ("077", 6, SubType::Super),
            ("078", 5, SubType::Super),
            ("0", 5, SubType::A),
            ("0", 5, SubType::B),
            ("0", 5, SubType::C),
        ]
    );
    let failed: Vec<&str> = res.failed.iter().map(|f| f.line.as_str()).collect();
    assert_eq!(failed, vec!["garbage !! 9x9"]);
    assert_eq!(res.last_number_type, Some(NumberType::SingleDigit));
}

#[test]
fn parsing_is_deterministic() {
    let ctx = context();
    let first = parse_with(CHAT, &ctx, &Options::default());
    let second = parse_with(CHAT, &ctx, &Options::default());
    assert_eq!(first.entries, second.entries);
    assert_eq!(first.failed, second.failed);
}

#[test]
fn priced_amounts_follow_commission_mode() {
    let res = parse_with("123 100\n5.100", &context(), &Options::default());

    // 10 x 100 at 46%
    assert_eq!(res.entries[0].customer_amount(), dec!(1000));
    assert_eq!(res.entries[0].dealer_amount(), dec!(540.00));
    // 12 x 100 less 0.5 per unit
    assert_eq!(res.entries[1].customer_amount(), dec!(1200));
    assert_eq!(res.entries[1].dealer_amount(), dec!(1150.00));
}

#[test]
fn second_pass_can_be_disabled() {
    let ctx = context();
    let text = "Ravi: abc 5 10\nRavi: 12.5";

    let off = Options { second_pass: false, rounding: Rounding::HalfUp };
    let res = parse_verbose_with(text, &ctx, &off);
    assert_eq!(res.result.failed.len(), 2);
    assert_eq!(res.details.recovered, 0);

    let res = parse_verbose_with(text, &ctx, &Options::default());
    assert_eq!(res.result.failed.len(), 1);
    assert_eq!(res.result.failed[0].line, "Ravi: 12.5");
    assert_eq!(res.details.recovered, 1);
    assert_eq!(res.details.lines[0].disposition, Disposition::Recovered);
    assert_eq!(res.details.lines[0].rule, "abc retry");
}

#[test]
fn empty_input_yields_nothing() {
    let res = parse_with("", &context(), &Options::default());
    assert!(res.entries.is_empty());
    assert!(res.failed.is_empty());
    assert_eq!(res.last_number_type, None);
}

#[test]
fn colon_separated_abc_is_recovered_after_chat_name() {
    let res = parse_verbose_with("Ravi: abc:5:10", &context(), &Options::default());
    assert!(res.result.failed.is_empty());
    let got: Vec<(&str, SubType)> = res.result.entries.iter().map(|e| (e.number(), e.sub_type())).collect();
    assert_eq!(got, vec![("5", SubType::A), ("5", SubType::B), ("5", SubType::C)]);
    assert_eq!(res.details.lines[0].disposition, Disposition::Recovered);
}

#[test]
fn matcher_is_reachable_through_parse_session() {
    let factory = EntryFactory::new(std::sync::Arc::new(pricing()), Rounding::HalfUp);
    let session = ParseSession::new(&factory, true);

    match session.matcher().match_line("bc:43:15") {
        ParseOutcome::Parsed(parsed) => assert_eq!(parsed.entries.len(), 1),
        other => panic!("should parse: {other:?}"),
    }
    assert_eq!(session.matcher().retry_line("Ravi: abc:5:10").map(|p| p.entries.len()), Some(3));
    assert!(ParseSession::new(&factory, false).matcher().retry_line("Ravi: abc:5:10").is_none());
}
