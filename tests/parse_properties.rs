use serde_ptargs::{Args, ErrorKind, parse};

fn single(input: &str) -> (String, String) {
    let args = parse(input).expect("valid input");
    assert_eq!(args.len(), 1, "expected exactly one key in {args:?}");
    let (key, values) = args.into_iter().next().unwrap();
    assert_eq!(values.len(), 1);
    (key, values.into_iter().next().unwrap())
}

#[test]
fn plain_pair_decodes_verbatim() {
    assert_eq!(single("shared-secret=rahasia"), ("shared-secret".into(), "rahasia".into()));
    assert_eq!(single("k=v w x"), ("k".into(), "v w x".into()));
}

#[test]
fn empty_input_is_an_empty_mapping() {
    let args = parse("").unwrap();
    assert!(args.is_empty());
    assert_eq!(args, Args::new());
}

#[test]
fn repeated_keys_accumulate_in_order() {
    let args = parse("a=1;a=2").unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(args.get_all("a").unwrap(), ["1", "2"]);
    assert_eq!(args.get("a"), Some("1"));
}

#[test]
fn interleaved_keys_keep_their_own_order() {
    let args = parse("a=1;b=x;a=2;b=y;a=3").unwrap();
    assert_eq!(args.get_all("a").unwrap(), ["1", "2", "3"]);
    assert_eq!(args.get_all("b").unwrap(), ["x", "y"]);
}

#[test]
fn trailing_separator_is_missing_equals() {
    let err = parse("a=1;").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingEquals);
    assert_eq!(err.fragment(), Some(""));
}

#[test]
fn trailing_backslash_is_dangling_escape() {
    let err = parse("a=1\\").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DanglingEscape);
}

#[test]
fn leading_equals_is_empty_key() {
    let err = parse("=1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyKey);
    assert_eq!(err.fragment(), Some("=1"));
}

#[test]
fn escaped_semicolon_in_key() {
    assert_eq!(single("a\\;b=1"), ("a;b".into(), "1".into()));
}

#[test]
fn escaped_equals_in_value() {
    assert_eq!(single("a=1\\=2"), ("a".into(), "1=2".into()));
}

#[test]
fn unescaped_equals_in_value_is_data() {
    assert_eq!(single("a=1=2"), ("a".into(), "1=2".into()));
}

#[test]
fn escaped_backslash_then_separator() {
    let args = parse(r"a=x\\;b=y").unwrap();
    assert_eq!(args.get("a"), Some(r"x\"));
    assert_eq!(args.get("b"), Some("y"));
}

#[test]
fn escape_is_not_a_translation_table() {
    assert_eq!(single(r"k=\n\t\x"), ("k".into(), "ntx".into()));
}

#[test]
fn empty_value_is_a_value() {
    let args = parse("a=;a=").unwrap();
    assert_eq!(args.get_all("a").unwrap(), ["", ""]);
}

#[test]
fn key_without_equals_before_separator() {
    let err = parse("a;b=1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingEquals);
    assert_eq!(err.fragment(), Some("a"));
}

#[test]
fn double_separator_is_missing_equals() {
    let err = parse("a=1;;b=2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingEquals);
    assert_eq!(err.fragment(), Some(""));
}

#[test]
fn no_partial_result_on_late_error() {
    // Every good pair before the bad one is discarded along with it.
    assert!(parse("a=1;b=2;c=3;=4").is_err());
}

#[test]
fn non_ascii_keys_and_values() {
    let args = parse("ключ=значение;鍵=値\\;").unwrap();
    assert_eq!(args.get("ключ"), Some("значение"));
    assert_eq!(args.get("鍵"), Some("値;"));
}

#[test]
fn realistic_obfs4_bridge_arguments() {
    let args = parse(
        "cert=ssH+9rP8dG2NLDN2XuFw63hIO/9MNNinLmxQDpVa+7kTOa9/m+tGWT1SmSYpQ9uTBGa6Hw;iat-mode=0",
    )
    .unwrap();
    assert_eq!(
        args.get("cert"),
        Some("ssH+9rP8dG2NLDN2XuFw63hIO/9MNNinLmxQDpVa+7kTOa9/m+tGWT1SmSYpQ9uTBGa6Hw")
    );
    assert_eq!(args.get("iat-mode"), Some("0"));
}
