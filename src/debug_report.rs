use bookslip::{BookingEntry, Disposition, FailedLine, LedgerTotals, LineSummary, ParseResultVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(run: &ParseResultVerbose, totals: &LedgerTotals, color: bool) {
    let palette = ansi::Palette::new(color);
    let lines = run.details.lines.len();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing {lines} line(s)"), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Lines ━━━", ansi::GRAY));
    for (idx, line) in run.details.lines.iter().enumerate() {
        println!("  {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), fmt_line(line, &palette));
    }

    println!("\n{}", palette.paint("━━━ Entries ━━━", ansi::GRAY));
    if run.result.entries.is_empty() {
        println!("{}", palette.dim("  No entries produced"));
    } else {
        for (idx, entry) in run.result.entries.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), fmt_entry(entry, &palette));
        }
    }

    if !run.result.failed.is_empty() {
        println!("\n{}", palette.paint("━━━ Not understood ━━━", ansi::GRAY));
        print_failed(&run.result.failed, &palette);
    }

    println!("\n{}", palette.paint("━━━ Totals ━━━", ansi::GRAY));
    println!(
        "  Count: {}  │  Customer: {}  │  Dealer: {}",
        palette.bold(totals.count.to_string()),
        palette.paint(totals.customer_amount.to_string(), ansi::GREEN),
        palette.paint(totals.dealer_amount.to_string(), ansi::CYAN),
    );
    if let Some(number_type) = run.result.last_number_type {
        println!("  {} {}", palette.dim("digit mode:"), palette.paint(number_type.to_string(), ansi::BLUE));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Recovered: {}  │  Rules: {}",
        palette.paint(format!("{:?}", run.details.total), ansi::GREEN),
        palette.paint(run.details.recovered.to_string(), ansi::YELLOW),
        palette.dim(run.details.rule_table.len().to_string()),
    );
    println!();
}

fn fmt_line(line: &LineSummary, palette: &ansi::Palette) -> String {
    let status = match line.disposition {
        Disposition::Parsed => palette.paint(format!("✓ {} entries", line.entries), ansi::GREEN),
        Disposition::Recovered => palette.paint(format!("↺ {} entries", line.entries), ansi::YELLOW),
        Disposition::Ignored => palette.dim("· ignored"),
        Disposition::Failed => palette.paint("✗ failed", ansi::RED),
    };
    format!(
        "{} {} {} {}",
        palette.bold(&line.line),
        status,
        palette.dim("│ rule:"),
        palette.paint(&line.rule, ansi::BLUE)
    )
}

fn fmt_entry(entry: &BookingEntry, palette: &ansi::Palette) -> String {
    format!(
        "{} {} {} {}  {} {}  {} {}",
        palette.bold(palette.paint(entry.number(), ansi::GREEN)),
        palette.paint(entry.sub_type().as_str(), ansi::BLUE),
        palette.dim("x"),
        palette.paint(entry.count().to_string(), ansi::YELLOW),
        palette.dim("customer:"),
        entry.customer_amount(),
        palette.dim("dealer:"),
        entry.dealer_amount(),
    )
}

fn print_failed(failed: &[FailedLine], palette: &ansi::Palette) {
    for line in failed {
        let reason = match (&line.reason, line.rule) {
            (Some(reason), _) => reason.to_string(),
            (None, Some(rule)) => format!("matched '{rule}' but produced nothing"),
            (None, None) => "no rule matched".to_string(),
        };
        println!("  {} {}", palette.paint(&line.line, ansi::RED), palette.dim(format!("({reason})")));
    }
}
