//! `miette` integration.
//!
//! This module is feature-gated behind the `miette` feature.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};

use crate::Error;
use crate::snippet::sanitize_control_chars;

/// Convert a decoding [`Error`] into a `miette::Report`.
///
/// This function takes the argument `source` and a display `file` name.
///
/// ```rust,no_run
/// let input = "cert=abc;iat-mode";
///
/// let err = serde_ptargs::parse(input).expect_err("missing equals sign");
/// let report = serde_ptargs::miette::to_miette_report(&err, input, "bridge-line");
///
/// // `Debug` formatting uses miette's graphical reporter.
/// eprintln!("{report:?}");
/// ```
///
/// Notes:
/// - [`Error`] does not retain the full input; this helper owns a copy of `source`.
/// - If the error has no known span, the report will not include labels.
pub fn to_miette_report(err: &Error, source: &str, file: &str) -> miette::Report {
    let sanitized = sanitize_control_chars(source);
    let src = Arc::new(NamedSource::new(file, sanitized));
    miette::Report::new(build_diagnostic(err.without_snippet(), src))
}

#[derive(Clone, Debug)]
struct ErrorDiagnostic {
    message: String,
    code: String,
    src: Arc<NamedSource<String>>,
    labels: Vec<LabeledSpan>,
}

impl fmt::Display for ErrorDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorDiagnostic {}

impl Diagnostic for ErrorDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }
}

fn build_diagnostic(err: &Error, src: Arc<NamedSource<String>>) -> ErrorDiagnostic {
    let message = err.to_string();
    let span = err.span();
    let source_len = src.inner().len();

    let mut labels = Vec::new();
    if span.is_known() && span.offset() <= source_len {
        let len = span.len().min(source_len - span.offset());
        let label = match err.kind() {
            crate::ErrorKind::DanglingEscape => "escape has nothing to escape",
            crate::ErrorKind::MissingEquals => "expected `=` after this key",
            crate::ErrorKind::EmptyKey => "key is empty",
            crate::ErrorKind::Budget => "budget exceeded here",
            crate::ErrorKind::Utf8 => "invalid UTF-8",
            _ => "here",
        };
        labels.push(LabeledSpan::new_with_span(
            Some(label.to_owned()),
            SourceSpan::new(span.offset().into(), len),
        ));
    }

    ErrorDiagnostic {
        message,
        code: format!("serde_ptargs::{}", err.kind()),
        src,
        labels,
    }
}
