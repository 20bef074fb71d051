mod debug_report;

use bookslip::{BookingLedger, Context, Options, PriceConfig, parse_verbose_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const DEFAULT_PRICING: &str = r#"{
  "single_digit_number_price": "12",
  "non_single_digit_price": "10",
  "commission": "46",
  "single_digit_number_commission": "0.5"
}"#;

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let ctx = Context::new(config.pricing);
    let opts = Options::default();
    let run = parse_verbose_with(&config.input, &ctx, &opts);

    let mut ledger = BookingLedger::new();
    ledger.append(run.result.entries.clone());

    if config.json {
        match serde_json::to_string_pretty(&ledger.submission()) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to encode submission: {err}");
                std::process::exit(1);
            }
        }
        for failed in &run.result.failed {
            eprintln!("not understood: {}", failed.line);
        }
        return;
    }

    match ledger.totals() {
        Ok(totals) => debug_report::print_run(&run, &totals, config.color),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// `BOOKSLIP_LOG` takes an `EnvFilter` directive; `BOOKSLIP_DEBUG_RULES=1` is
/// shorthand for `debug`. Logs go to stderr so stdout stays a clean report.
fn init_tracing() {
    let debug_rules = std::env::var("BOOKSLIP_DEBUG_RULES").is_ok_and(|v| v == "1");
    let filter = if debug_rules {
        EnvFilter::new("bookslip=debug")
    } else {
        EnvFilter::try_from_env("BOOKSLIP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    input: String,
    pricing: PriceConfig,
    json: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut pricing_path: Option<String> = None;
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("bookslip {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--pricing" => {
                let value = args.next().ok_or_else(|| "error: --pricing expects a file".to_string())?;
                pricing_path = Some(value);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join("\n");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--pricing=") => {
                pricing_path = Some(arg.trim_start_matches("--pricing=").to_string());
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                // Each trailing argument is one pasted line.
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join("\n");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let pricing = load_pricing(pricing_path.as_deref())?;

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, pricing, json, color })
}

fn load_pricing(path: Option<&str>) -> Result<PriceConfig, String> {
    match path {
        Some(path) => PriceConfig::load(path).map_err(|err| format!("error: invalid pricing file '{path}': {err}")),
        None => PriceConfig::from_json_str(DEFAULT_PRICING).map_err(|err| format!("error: default pricing: {err}")),
    }
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "bookslip {version}

Parse pasted booking lines into priced entries.

Usage:
  bookslip [OPTIONS] [--] <line...>
  bookslip [OPTIONS] --input <text>
  pbpaste | bookslip [OPTIONS]

Options:
  -i, --input <text>         Text to parse. If omitted, reads remaining args
                             (one line each) or stdin when no args are provided.
  --pricing <file.json>      Pricing table. Default:
{default_pricing}
  --json                     Print the submission payload instead of the report.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  BOOKSLIP_LOG               Log filter (e.g. debug, bookslip=trace). Default: warn
  BOOKSLIP_DEBUG_RULES=1     Shorthand for debug logging.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments, pricing or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_pricing = DEFAULT_PRICING
    )
}
