//! Source location utilities.

use serde::{Deserialize, Serialize};

/// A byte range within the source argument string.
///
/// Offsets are counted in bytes (UTF-8 code units) from the start of the input that was
/// handed to the parser, not from the start of the fragment being scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Span {
    /// Sentinel span meaning "unknown".
    pub const UNKNOWN: Self = Self {
        offset: usize::MAX,
        len: 0,
    };

    pub(crate) const fn new(start: usize, end: usize) -> Self {
        Self {
            offset: start,
            len: end.saturating_sub(start),
        }
    }

    /// Byte offset of the first byte covered by this span.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes covered by this span.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.len)
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }

    /// Shift the span right by `by` bytes. Used to translate spans reported against a
    /// sub-slice back into the coordinates of the full input.
    pub(crate) fn shifted(self, by: usize) -> Self {
        if self.is_known() {
            Self {
                offset: self.offset + by,
                len: self.len,
            }
        } else {
            self
        }
    }
}

/// Line/column location within the source (1-indexed, character-based columns).
///
/// Argument strings are almost always a single line, but files read by the bundled binary
/// may contain line breaks inside values, so both coordinates are tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub(crate) line: u32,
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    /// Coordinates past `u32::MAX` saturate.
    pub(crate) fn new(line: usize, column: usize) -> Self {
        Self {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            column: u32::try_from(column).unwrap_or(u32::MAX),
        }
    }

    /// 1-based line number.
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-based column, counted in characters.
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    /// Resolve a byte offset within `source` to a line/column pair.
    ///
    /// Offsets past the end resolve to the position just after the last character.
    /// Offsets inside a multi-byte character resolve to that character's column.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1usize;
        let mut column = 1usize;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if i + ch.len_utf8() > offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self::new(line, column)
    }
}
