use std::cell::RefCell;
use std::rc::Rc;

use serde_ptargs::{
    Budget, BudgetBreach, BudgetReport, ErrorKind, Options, check_budget, parse_with_options,
};

#[test]
fn defaults_accept_ordinary_bridge_lines() {
    let report = check_budget("cert=AAAAAAAA;iat-mode=0", &Budget::default()).unwrap();
    assert_eq!(report.breached, None);
    assert_eq!(report.keys, 2);
}

#[test]
fn oversized_input_is_rejected_before_decoding() {
    let options = serde_ptargs::options! {
        budget: Some(serde_ptargs::budget! { max_input_bytes: 16 }),
    };
    let input = format!("a={}", "x".repeat(32));
    let err = parse_with_options(&input, &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Budget);
    assert!(matches!(
        err.without_snippet(),
        serde_ptargs::Error::Budget {
            breach: BudgetBreach::InputBytes { input_bytes: 34 },
            ..
        }
    ));
}

#[test]
fn many_values_under_one_key_are_capped() {
    let input = vec!["k=v"; 10].join(";");
    let options = serde_ptargs::options! {
        budget: Some(serde_ptargs::budget! { max_values_per_key: 4 }),
        with_snippet: false,
    };
    let err = parse_with_options(&input, &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"argument budget breached: ValuesPerKey { key: "k", values: 5 }"#
    );
}

#[test]
fn no_budget_means_no_limits() {
    let input = vec!["k=v"; 64].join(";");
    let options = serde_ptargs::options! {
        budget: None,
        with_snippet: false,
    };
    let args = parse_with_options(&input, &options).unwrap();
    assert_eq!(args.get_all("k").unwrap().len(), 64);
}

#[test]
fn report_callback_sees_the_final_counts() {
    let seen: Rc<RefCell<Option<BudgetReport>>> = Rc::default();
    let sink = seen.clone();
    let options = Options::default().with_budget_report(move |r| *sink.borrow_mut() = Some(r));

    parse_with_options(r"a=1;b=two\;three;a=4", &options).unwrap();

    let report = seen.borrow().clone().expect("callback ran");
    assert_eq!(report.breached, None);
    assert_eq!(report.pairs, 3);
    assert_eq!(report.keys, 2);
    assert_eq!(report.max_values_per_key, 2);
    assert_eq!(report.max_value_bytes, "two;three".len());
}

#[test]
fn report_callback_runs_on_syntax_errors_too() {
    let seen: Rc<RefCell<Option<BudgetReport>>> = Rc::default();
    let sink = seen.clone();
    let options = Options::default().with_budget_report(move |r| *sink.borrow_mut() = Some(r));

    assert!(parse_with_options("a=1;b=2;c", &options).is_err());
    let report = seen.borrow().clone().expect("callback ran");
    assert_eq!(report.pairs, 2);
    assert_eq!(report.breached, None);
}

#[test]
fn budget_serializes_with_field_names() {
    let json = serde_json::to_value(Budget::default()).unwrap();
    assert_eq!(json["max_pairs"], 4096);
    assert_eq!(json["max_value_bytes"], 65536);
}
