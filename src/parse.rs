//! Key-value parser over the escape-aware scanner.
//!
//! The input is a sequence of `key=value` pairs separated by `;`. Within keys and values a
//! backslash makes the next character literal, which is how `=`, `;` and `\` are embedded:
//!
//! ```text
//! shared-secret=rahasia;secrets=a\;b\=c;rocket=no\\way
//! ```
//!
//! decodes to `shared-secret → ["rahasia"]`, `secrets → ["a;b=c"]`, `rocket → ["no\way"]`.

use crate::args::Args;
use crate::budget::{BudgetEnforcer, budget_error};
use crate::error::Error;
use crate::location::Span;
use crate::options::Options;
use crate::scan::{KEY_TERMINATORS, VALUE_TERMINATORS, scan};

/// One decoded `key=value` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
    /// Bytes of the input this pair was decoded from, excluding the trailing `;`.
    pub span: Span,
}

/// Streaming iterator over the pairs of an argument string.
///
/// Yields pairs in order of appearance. After the first error the iterator is exhausted;
/// no pair after a malformed one is ever produced.
///
/// ```rust
/// use serde_ptargs::Pairs;
///
/// let keys: Vec<String> = Pairs::new("a=1;b=2")
///     .map(|pair| pair.map(|p| p.key))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(keys, ["a", "b"]);
/// ```
#[derive(Clone, Debug)]
pub struct Pairs<'a> {
    input: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Pairs<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            // The empty string holds zero pairs, not one malformed pair.
            done: input.is_empty(),
        }
    }

    fn fail(&mut self, err: Error) -> Option<Result<Pair, Error>> {
        log::debug!("argument string rejected: {err}");
        self.done = true;
        Some(Err(err))
    }
}

impl Iterator for Pairs<'_> {
    type Item = Result<Pair, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let input = self.input;
        let begin = self.pos;

        let key = match scan(&input[self.pos..], KEY_TERMINATORS) {
            Ok(token) => token,
            Err(err) => return self.fail(err.shifted(begin)),
        };
        self.pos += key.stop;

        if input.as_bytes().get(self.pos) != Some(&b'=') {
            return self.fail(Error::MissingEquals {
                fragment: input[begin..self.pos].to_owned(),
                span: Span::new(begin, self.pos),
            });
        }
        self.pos += 1;

        let value_start = self.pos;
        let value = match scan(&input[self.pos..], VALUE_TERMINATORS) {
            Ok(token) => token,
            Err(err) => return self.fail(err.shifted(value_start)),
        };
        self.pos += value.stop;

        // Checked only once the value is consumed, so the fragment covers the whole pair.
        if key.decoded.is_empty() {
            return self.fail(Error::EmptyKey {
                fragment: input[begin..self.pos].to_owned(),
                span: Span::new(begin, self.pos),
            });
        }

        let span = Span::new(begin, self.pos);
        if self.pos >= input.len() {
            self.done = true;
        } else {
            // Skip the `;` separator.
            self.pos += 1;
        }

        log::trace!(
            "decoded argument {:?} ({} value bytes)",
            key.decoded,
            value.decoded.len()
        );
        Some(Ok(Pair {
            key: key.decoded,
            value: value.decoded,
            span,
        }))
    }
}

impl std::iter::FusedIterator for Pairs<'_> {}

/// Decode an argument string into an [`Args`] mapping.
///
/// The empty string decodes to an empty mapping. Any malformed pair aborts the whole
/// decode; there is no partial result.
///
/// This is the bare decoder: no budget is applied and errors are not wrapped with
/// snippets. See [`parse_with_options`].
///
/// ```rust
/// let args = serde_ptargs::parse(r"a=1;a=2;b\;c=x\=y").unwrap();
/// assert_eq!(args.get_all("a").unwrap(), ["1", "2"]);
/// assert_eq!(args.get("b;c"), Some("x=y"));
/// ```
pub fn parse(input: &str) -> Result<Args, Error> {
    decode(input, None)
}

/// Decode an argument string applying the given [`Options`]: budget enforcement, budget
/// report callbacks and snippet rendering of errors.
pub fn parse_with_options(input: &str, options: &Options) -> Result<Args, Error> {
    let mut enforcer = options.budget.clone().map(BudgetEnforcer::new);
    let result = decode(input, enforcer.as_mut());
    if let Some(enforcer) = enforcer {
        options.report_budget(enforcer.finalize());
    }
    result.map_err(|err| {
        if options.with_snippet {
            err.with_snippet(input, options.crop_radius)
        } else {
            err
        }
    })
}

/// Decode UTF-8 bytes. Invalid UTF-8 fails with [`Error::Utf8`].
pub fn parse_slice(bytes: &[u8]) -> Result<Args, Error> {
    parse(to_str(bytes)?)
}

/// Like [`parse_with_options`], for UTF-8 bytes.
pub fn parse_slice_with_options(bytes: &[u8], options: &Options) -> Result<Args, Error> {
    parse_with_options(to_str(bytes)?, options)
}

pub(crate) fn to_str(bytes: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|err| Error::Utf8 {
        offset: err.valid_up_to(),
    })
}

fn decode(input: &str, mut enforcer: Option<&mut BudgetEnforcer>) -> Result<Args, Error> {
    if let Some(enforcer) = enforcer.as_deref_mut() {
        enforcer
            .observe_input(input)
            .map_err(|breach| budget_error(breach, Span::new(0, input.len())))?;
    }

    let mut args = Args::new();
    for pair in Pairs::new(input) {
        let Pair { key, value, span } = pair?;
        if let Some(enforcer) = enforcer.as_deref_mut() {
            let count = args.get_all(&key).map_or(0, <[String]>::len) + 1;
            enforcer
                .observe_pair(&key, &value, count)
                .map_err(|breach| budget_error(breach, span))?;
        }
        args.add(key, value);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn pairs(input: &str) -> Vec<(String, String)> {
        Pairs::new(input)
            .map(|p| p.map(|p| (p.key, p.value)))
            .collect::<Result<_, _>>()
            .expect("valid input")
    }

    #[test]
    fn empty_input_has_no_pairs() {
        assert!(pairs("").is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn pair_spans_exclude_separator() {
        let spans: Vec<Span> = Pairs::new("a=1;bb=22")
            .map(|p| p.unwrap().span)
            .collect();
        assert_eq!(spans, [Span::new(0, 3), Span::new(4, 9)]);
    }

    #[test]
    fn empty_values_are_kept() {
        assert_eq!(
            pairs("a=;b="),
            [("a".to_owned(), String::new()), ("b".to_owned(), String::new())]
        );
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut it = Pairs::new("a=1;b;c=3");
        assert!(it.next().unwrap().is_ok());
        let err = it.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingEquals);
        assert_eq!(err.fragment(), Some("b"));
        assert_eq!(err.span(), Span::new(4, 5));
        assert!(it.next().is_none());
    }

    #[test]
    fn dangling_escape_span_is_absolute() {
        let err = parse(r"a=1;b=2\").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingEscape);
        assert_eq!(err.fragment(), Some(r"2\"));
        assert_eq!(err.span(), Span::new(6, 8));

        let err = parse(r"a=1;b\").unwrap_err();
        assert_eq!(err.fragment(), Some(r"b\"));
        assert_eq!(err.span(), Span::new(4, 6));
    }

    #[test]
    fn empty_key_fragment_includes_value() {
        let err = parse("a=1;=xyz;c=3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyKey);
        assert_eq!(err.fragment(), Some("=xyz"));
        assert_eq!(err.span(), Span::new(4, 8));
    }

    #[test]
    fn dangling_escape_wins_over_empty_key() {
        // The value is scanned before the key is checked for emptiness.
        let err = parse("=x\\").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingEscape);
        assert_eq!(err.fragment(), Some("x\\"));
        assert_eq!(err.span(), Span::new(1, 3));
    }

    #[test]
    fn escaped_empty_looking_key_is_not_empty() {
        // `\=` is a key consisting of a literal equals sign.
        let args = parse(r"\==1").unwrap();
        assert_eq!(args.get("="), Some("1"));
    }

    #[test]
    fn semicolon_inside_key_position_is_missing_equals() {
        let err = parse(";a=1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingEquals);
        assert_eq!(err.fragment(), Some(""));
        assert_eq!(err.span(), Span::new(0, 0));
    }

    #[test]
    fn invalid_utf8_reports_offset() {
        let err = parse_slice(b"a=\xffb").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Utf8);
        assert_eq!(err.span(), Span::new(2, 3));
        assert_eq!(parse_slice(b"a=b").unwrap().get("a"), Some("b"));
    }

    #[test]
    fn options_apply_budget_and_snippets() {
        let options = crate::options! {
            budget: Some(crate::budget! { max_pairs: 1 }),
        };
        let err = parse_with_options("a=1;b=2", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Budget);
        assert_eq!(err.span(), Span::new(4, 7));
        assert!(err.to_string().contains("<input>"), "got:\n{err}");

        let options = crate::options! { with_snippet: false };
        let err = parse_with_options("a", &options).unwrap_err();
        assert!(matches!(err, Error::MissingEquals { .. }));
    }
}
