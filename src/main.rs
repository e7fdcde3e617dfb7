#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::process::exit;
use std::rc::Rc;

use serde_ptargs::budget::BudgetReport;
use serde_ptargs::scan::strip_line_ending;
use serde_ptargs::{Options, parse_with_options};

const USAGE: &str = "\
Usage: serde-ptargs <ARGS>
       serde-ptargs -f <FILE>

Decodes a semicolon-delimited, backslash-escaped argument string (for example the
SOCKS username of a pluggable transport) and prints every decoded key and value,
followed by the budget report. Can also be used as a validator: the exit code is
non-zero if the string is malformed.

Options:
  -f, --file <FILE>  Read the argument string from FILE (a trailing newline is ignored
                     unless it is escaped with a backslash)
  -h, --help         Print this help";

enum Input {
    Inline(String),
    File(String),
}

fn parse_cli(mut args: impl Iterator<Item = String>) -> Result<Option<Input>, String> {
    let Some(first) = args.next() else {
        return Err(USAGE.to_owned());
    };
    let input = match first.as_str() {
        "-h" | "--help" => return Ok(None),
        "-f" | "--file" => match args.next() {
            Some(path) => Input::File(path),
            None => return Err(format!("Option {first} requires a file name\n\n{USAGE}")),
        },
        other if other.starts_with('-') && other.len() > 1 => {
            return Err(format!("Unknown option: {other}\n\n{USAGE}"));
        }
        _ => Input::Inline(first),
    };
    if let Some(extra) = args.next() {
        return Err(format!("Unexpected argument: {extra}\n\n{USAGE}"));
    }
    Ok(Some(input))
}

/// Decode an argument string given on the command line or in a file and print the result.
fn main() {
    let input = match parse_cli(std::env::args().skip(1)) {
        Ok(Some(input)) => input,
        Ok(None) => {
            println!("{USAGE}");
            return;
        }
        Err(msg) => {
            eprintln!("{msg}");
            exit(1);
        }
    };

    let content = match input {
        Input::Inline(text) => text,
        Input::File(path) => match std::fs::read_to_string(&path) {
            Ok(content) => strip_line_ending(&content).to_owned(),
            Err(err) => {
                eprintln!("Failed to read {path}: {err}");
                exit(2);
            }
        },
    };

    let report: Rc<RefCell<Option<BudgetReport>>> = Rc::new(RefCell::new(None));
    let sink = report.clone();
    let options = Options::default().with_budget_report(move |r| {
        *sink.borrow_mut() = Some(r);
    });

    match parse_with_options(&content, &options) {
        Ok(args) => {
            for (key, values) in args.sorted() {
                for value in values {
                    println!("{key} = {value:?}");
                }
            }
            if let Some(report) = report.borrow().as_ref() {
                println!("Budget report:\n{report:#?}");
            }
        }
        Err(err) => {
            eprintln!("invalid argument string:\n{err}");
            exit(3);
        }
    }
}
