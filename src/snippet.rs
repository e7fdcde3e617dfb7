//! Rustc-like snippet rendering for errors with a known span.

use annotate_snippets::{
    AnnotationKind, Level, Renderer, Snippet as AnnotateSnippet, renderer::DecorStyle,
};

use crate::location::{Location, Span};

/// Display path used in the snippet header.
pub(crate) const INPUT_PATH: &str = "<input>";

/// Replace ASCII control characters (other than `\n` and `\t`) with `?`.
///
/// Argument strings come from untrusted peers; echoing raw escape sequences to a terminal
/// would let them repaint it. Every replacement is one byte for one byte, so spans stay
/// valid against the sanitized text.
pub(crate) fn sanitize_control_chars(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_control() && c != '\n' && c != '\t' {
                '?'
            } else {
                c
            }
        })
        .collect()
}

/// Render `msg` with a cropped window of `source` around `span`.
///
/// Returns `None` when the span is unknown, lies outside `source`, or `crop_radius` is
/// zero, in which case the caller should fall back to the plain message.
#[cold]
#[inline(never)]
pub(crate) fn render(source: &str, span: Span, msg: &str, crop_radius: usize) -> Option<String> {
    if crop_radius == 0 || !span.is_known() || span.offset() > source.len() {
        return None;
    }
    let start = span.offset();
    if !source.is_char_boundary(start) {
        return None;
    }

    // Only the line holding the start of the span is shown.
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[start..]
        .find('\n')
        .map_or(source.len(), |i| start + i);
    let mut end = span.end().min(line_end);
    while !source.is_char_boundary(end) {
        end -= 1;
    }

    // Horizontal cropping (by characters) for long lines.
    let window_start = source[line_start..start]
        .char_indices()
        .rev()
        .take(crop_radius)
        .last()
        .map_or(start, |(i, _)| line_start + i);
    let window_end = source[end..line_end]
        .char_indices()
        .nth(crop_radius)
        .map_or(line_end, |(i, _)| end + i);

    let window_text = sanitize_control_chars(&source[window_start..window_end]);
    let local_start = start - window_start;
    let local_end = end - window_start;

    let location = Location::from_offset(source, start);
    let line = location.line() as usize;
    let column = location.column();

    let report = &[Level::ERROR
        .primary_title(format!("line {line} column {column}: {msg}"))
        .element(
            AnnotateSnippet::source(window_text.as_str())
                .line_start(line)
                .path(INPUT_PATH)
                .fold(false)
                .annotation(
                    AnnotationKind::Primary
                        .span(local_start..local_end)
                        .label(msg),
                ),
        )];

    // Caret markers and no ANSI colors, so error strings stay stable.
    let renderer = Renderer::plain().decor_style(DecorStyle::Ascii);
    Some(renderer.render(report).to_string())
}
