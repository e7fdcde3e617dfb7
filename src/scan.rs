//! Escape-aware token scanner.
//!
//! The scanner walks a string, drops every backslash while taking the character after it
//! literally, and stops at the first *unescaped* terminator byte. Escapes and delimiters are
//! resolved in the same pass: an escaped terminator is data, never a delimiter.

use crate::error::Error;
use crate::location::Span;

/// The escape introducer.
pub const ESCAPE: u8 = b'\\';

/// Terminators that end a key: the `=` separating it from its value, or a `;` that would
/// indicate a missing value.
pub const KEY_TERMINATORS: &[u8] = b"=;";

/// Terminators that end a value.
pub const VALUE_TERMINATORS: &[u8] = b";";

/// Result of a successful scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Byte offset (within the scanned string) of the terminator that stopped the scan,
    /// or the string length if no terminator was found.
    pub stop: usize,
    /// The unescaped text preceding `stop`.
    pub decoded: String,
}

/// Scan `input` up to the first unescaped byte contained in `terminators`.
///
/// Terminators must be ASCII and must not include the backslash. Since every syntax byte is
/// ASCII, walking by `char` is equivalent to walking by byte, and an escaped multi-byte
/// character is copied whole.
///
/// Fails with [`Error::DanglingEscape`] when the input ends in an unpaired backslash; the
/// error carries the whole scanned `input` as its fragment.
pub fn scan(input: &str, terminators: &[u8]) -> Result<Token, Error> {
    debug_assert!(terminators.iter().all(|b| b.is_ascii() && *b != ESCAPE));

    let mut decoded = String::with_capacity(input.len());
    let mut chars = input.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch.is_ascii() && terminators.contains(&(ch as u8)) {
            return Ok(Token { stop: i, decoded });
        }
        if ch == ESCAPE as char {
            match chars.next() {
                Some((_, escaped)) => decoded.push(escaped),
                None => {
                    return Err(Error::DanglingEscape {
                        fragment: input.to_owned(),
                        span: Span::new(0, input.len()),
                    });
                }
            }
        } else {
            decoded.push(ch);
        }
    }
    Ok(Token {
        stop: input.len(),
        decoded,
    })
}

/// Strip one trailing line ending (`\n` or `\r\n`) from text read out of a file.
///
/// A newline preceded by an odd run of backslashes is escaped data and is kept, so
/// `k=a\` followed by a newline still decodes to the value `"a\n"`.
pub fn strip_line_ending(input: &str) -> &str {
    let Some(body) = input.strip_suffix('\n') else {
        return input;
    };
    let body = body.strip_suffix('\r').unwrap_or(body);
    let escapes = body.bytes().rev().take_while(|&b| b == ESCAPE).count();
    if escapes % 2 == 1 { input } else { body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ok(input: &str, terminators: &[u8]) -> (usize, String) {
        let token = scan(input, terminators).expect("scan should succeed");
        (token.stop, token.decoded)
    }

    #[test]
    fn stops_at_first_terminator() {
        assert_eq!(ok("key=value", KEY_TERMINATORS), (3, "key".to_owned()));
        assert_eq!(ok("key;value", KEY_TERMINATORS), (3, "key".to_owned()));
        assert_eq!(ok("value;next", VALUE_TERMINATORS), (5, "value".to_owned()));
    }

    #[test]
    fn runs_to_end_without_terminator() {
        assert_eq!(ok("plain", KEY_TERMINATORS), (5, "plain".to_owned()));
        assert_eq!(ok("", KEY_TERMINATORS), (0, String::new()));
    }

    #[test]
    fn terminator_at_start_yields_empty_token() {
        assert_eq!(ok("=x", KEY_TERMINATORS), (0, String::new()));
    }

    #[test]
    fn escaped_terminators_are_data() {
        assert_eq!(ok(r"a\;b=1", KEY_TERMINATORS), (4, "a;b".to_owned()));
        assert_eq!(ok(r"1\=2", VALUE_TERMINATORS), (4, "1=2".to_owned()));
        assert_eq!(ok(r"x\\;y", VALUE_TERMINATORS), (3, r"x\".to_owned()));
    }

    #[test]
    fn escaping_ordinary_characters_drops_the_backslash() {
        assert_eq!(ok(r"\a\b\n", KEY_TERMINATORS), (6, "abn".to_owned()));
    }

    #[test]
    fn escaped_multibyte_character_is_copied_whole() {
        assert_eq!(ok("\\é=", KEY_TERMINATORS), (3, "é".to_owned()));
    }

    #[test]
    fn equals_is_not_a_value_terminator() {
        assert_eq!(ok("a=b=c", VALUE_TERMINATORS), (5, "a=b=c".to_owned()));
    }

    #[test]
    fn trailing_backslash_is_a_dangling_escape() {
        let err = scan(r"abc\", KEY_TERMINATORS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DanglingEscape);
        assert_eq!(err.fragment(), Some(r"abc\"));
        assert_eq!(err.span(), Span::new(0, 4));
    }

    #[test]
    fn escaped_backslash_at_end_is_fine() {
        assert_eq!(ok(r"abc\\", KEY_TERMINATORS), (5, r"abc\".to_owned()));
    }

    #[test]
    fn line_ending_is_stripped_unless_escaped() {
        assert_eq!(strip_line_ending("k=v\n"), "k=v");
        assert_eq!(strip_line_ending("k=v\r\n"), "k=v");
        assert_eq!(strip_line_ending("k=v"), "k=v");
        assert_eq!(strip_line_ending("k=v\\\\\n"), "k=v\\\\");
        assert_eq!(strip_line_ending("k=a\\\n"), "k=a\\\n");
        assert_eq!(strip_line_ending("k=a\\\r\n"), "k=a\\\r\n");
    }
}
