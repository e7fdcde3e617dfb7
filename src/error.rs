//! Defines error and its location
use std::fmt;

use serde::de;

use crate::budget::BudgetBreach;
use crate::location::{Location, Span};

/// Error type compatible with `serde::de::Error`.
///
/// The three syntax variants carry the offending fragment of the input verbatim (still
/// escaped) together with its byte span, so callers can report or highlight it without
/// matching on message text.
#[derive(Debug)]
pub enum Error {
    /// A backslash was the last byte of the scanned text, with nothing to escape.
    DanglingEscape { fragment: String, span: Span },
    /// A key was not followed by an unescaped `=` before the next `;` or end of input.
    MissingEquals { fragment: String, span: Span },
    /// An `=` was found but the key before it decoded to the empty string.
    EmptyKey { fragment: String, span: Span },
    /// An argument budget limit was exceeded.
    Budget { breach: BudgetBreach, span: Span },
    /// Byte input was not valid UTF-8.
    Utf8 { offset: usize },
    /// Free-form error, produced while deserializing decoded values into user types.
    Message { msg: String },
    /// Unexpected I/O error while reading input from a file.
    IOError { cause: std::io::Error },
    /// Wrap an error with a rendered, rustc-like snippet of the input.
    WithSnippet {
        /// Pre-rendered snippet output (cropped) for display.
        ///
        /// The full input is not retained, since argument strings may hold credentials.
        text: String,
        crop_radius: usize,
        error: Box<Error>,
    },
}

/// Discriminant of [`Error`], for matching without destructuring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DanglingEscape,
    MissingEquals,
    EmptyKey,
    Budget,
    Utf8,
    Message,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::DanglingEscape => "dangling_escape",
            ErrorKind::MissingEquals => "missing_equals",
            ErrorKind::EmptyKey => "empty_key",
            ErrorKind::Budget => "budget",
            ErrorKind::Utf8 => "utf8",
            ErrorKind::Message => "message",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Construct a `Message` error.
    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message { msg: s.into() }
    }

    /// Unwrap any snippet wrapper and return the underlying error.
    pub fn without_snippet(&self) -> &Error {
        match self {
            Error::WithSnippet { error, .. } => error.without_snippet(),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.without_snippet() {
            Error::DanglingEscape { .. } => ErrorKind::DanglingEscape,
            Error::MissingEquals { .. } => ErrorKind::MissingEquals,
            Error::EmptyKey { .. } => ErrorKind::EmptyKey,
            Error::Budget { .. } => ErrorKind::Budget,
            Error::Utf8 { .. } => ErrorKind::Utf8,
            Error::Message { .. } => ErrorKind::Message,
            Error::IOError { .. } => ErrorKind::Io,
            Error::WithSnippet { error, .. } => error.kind(),
        }
    }

    /// The offending input fragment, for syntax errors.
    pub fn fragment(&self) -> Option<&str> {
        match self.without_snippet() {
            Error::DanglingEscape { fragment, .. }
            | Error::MissingEquals { fragment, .. }
            | Error::EmptyKey { fragment, .. } => Some(fragment),
            _ => None,
        }
    }

    /// Byte span of the problem within the parsed input, or [`Span::UNKNOWN`].
    pub fn span(&self) -> Span {
        match self.without_snippet() {
            Error::DanglingEscape { span, .. }
            | Error::MissingEquals { span, .. }
            | Error::EmptyKey { span, .. }
            | Error::Budget { span, .. } => *span,
            Error::Utf8 { offset } => Span::new(*offset, *offset + 1),
            _ => Span::UNKNOWN,
        }
    }

    /// Line/column of the start of [`Error::span`] within `source`, if known.
    pub fn location(&self, source: &str) -> Option<Location> {
        let span = self.span();
        span.is_known()
            .then(|| Location::from_offset(source, span.offset()))
    }

    /// Translate spans reported against a sub-slice into coordinates of the full input.
    pub(crate) fn shifted(mut self, by: usize) -> Self {
        match &mut self {
            Error::DanglingEscape { span, .. }
            | Error::MissingEquals { span, .. }
            | Error::EmptyKey { span, .. }
            | Error::Budget { span, .. } => *span = span.shifted(by),
            Error::Utf8 { offset } => *offset += by,
            _ => {}
        }
        self
    }

    /// Prefix a deserialization message with the key whose value failed.
    pub(crate) fn for_key(self, key: &str) -> Self {
        match self {
            Error::Message { msg } => Error::Message {
                msg: format!("invalid value for key `{key}`: {msg}"),
            },
            other => other,
        }
    }

    /// Wrap this error with a snippet rendered from `source`. Errors without a known span
    /// (and a zero `crop_radius`) are returned unchanged.
    pub(crate) fn with_snippet(self, source: &str, crop_radius: usize) -> Self {
        // Avoid nesting snippet wrappers.
        let inner = match self {
            Error::WithSnippet { error, .. } => *error,
            other => other,
        };
        let msg = inner.to_string();
        match crate::snippet::render(source, inner.span(), &msg, crop_radius) {
            Some(text) => Error::WithSnippet {
                text,
                crop_radius,
                error: Box::new(inner),
            },
            None => inner,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DanglingEscape { fragment, .. } => {
                write!(f, "nothing following final escape in {fragment:?}")
            }
            Error::MissingEquals { fragment, .. } => {
                write!(f, "no equals sign in {fragment:?}")
            }
            Error::EmptyKey { fragment, .. } => write!(f, "empty key in {fragment:?}"),
            Error::Budget { breach, .. } => write!(f, "argument budget breached: {breach:?}"),
            Error::Utf8 { offset } => write!(f, "invalid UTF-8 at byte {offset}"),
            Error::Message { msg } => f.write_str(msg),
            Error::IOError { cause } => write!(f, "IO error: {cause}"),
            Error::WithSnippet { text, .. } => f.write_str(text),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError { cause } => Some(cause),
            Error::WithSnippet { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::msg(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::IOError { cause }
    }
}
