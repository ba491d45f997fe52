//! Scanning and decoding of the four string forms.
//!
//! Scanning validates a string in place and reports the span of its content.
//! Decoding happens later, on demand, and borrows from the input whenever the
//! content holds no escapes.

use crate::arena::StringStyle;
use crate::classify::{decode_utf8, is_control, is_hex_digit, is_whitespace, newline_len};
use crate::{ErrorKind, Span};
use std::borrow::Cow;

#[cfg(test)]
#[path = "./string_tests.rs"]
mod tests;

/// A scanned string literal.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct StringToken {
    /// Offset just past the closing delimiter.
    pub end: usize,
    /// The content between the delimiters, after the trimmed leading newline
    /// of multi-line forms.
    pub content: Span,
    pub style: StringStyle,
}

/// Scans the string whose opening delimiter sits at `start`.
pub(crate) fn munch(input: &[u8], start: usize) -> Result<StringToken, ErrorKind> {
    let delim = input[start];
    let basic = delim == b'"';
    let mut i = start + 1;

    let multiline = if input.get(i) == Some(&delim) {
        if input.get(i + 1) == Some(&delim) {
            i += 2;
            true
        } else {
            // `""` or `''`
            return Ok(StringToken {
                end: i + 1,
                content: Span::from_offsets(i, i),
                style: if basic {
                    StringStyle::Basic
                } else {
                    StringStyle::Literal
                },
            });
        }
    } else {
        false
    };

    let style = match (basic, multiline) {
        (true, false) => StringStyle::Basic,
        (false, false) => StringStyle::Literal,
        (true, true) => StringStyle::MultilineBasic,
        (false, true) => StringStyle::MultilineLiteral,
    };

    if multiline {
        i += newline_len(input, i);
    }
    let content_start = i;

    loop {
        let Some(&b) = input.get(i) else {
            return Err(ErrorKind::Boundary);
        };
        match b {
            d if d == delim => {
                if !multiline {
                    return Ok(StringToken {
                        end: i + 1,
                        content: Span::from_offsets(content_start, i),
                        style,
                    });
                }
                let mut run = 1;
                while input.get(i + run) == Some(&delim) {
                    run += 1;
                }
                if run < 3 {
                    i += run;
                    continue;
                }
                // The last three close the string; up to two before them are
                // content.
                if run > 5 {
                    return Err(ErrorKind::Lexical);
                }
                return Ok(StringToken {
                    end: i + run,
                    content: Span::from_offsets(content_start, i + run - 3),
                    style,
                });
            }
            b'\\' if basic => match scan_escape(input, i + 1, multiline) {
                Ok(next) => i = next,
                Err(e) => return Err(e),
            },
            b'\n' | b'\r' => {
                let nl = newline_len(input, i);
                if nl == 0 {
                    return Err(ErrorKind::Lexical);
                }
                if !multiline {
                    return Err(ErrorKind::Structural);
                }
                i += nl;
            }
            b if is_control(b) => return Err(ErrorKind::Lexical),
            0x00..=0x7F => i += 1,
            _ => match decode_utf8(input, i) {
                Some((_, len)) => i += len,
                None => return Err(ErrorKind::Lexical),
            },
        }
    }
}

/// Validates the escape whose backslash precedes `at`; returns the offset
/// after it.
fn scan_escape(input: &[u8], at: usize, multiline: bool) -> Result<usize, ErrorKind> {
    let Some(&b) = input.get(at) else {
        return Err(ErrorKind::Boundary);
    };
    match b {
        b'"' | b'\\' | b'b' | b'f' | b'n' | b'r' | b't' => Ok(at + 1),
        b'u' => scan_unicode(input, at + 1, 4),
        b'U' => scan_unicode(input, at + 1, 8),
        b' ' | b'\t' | b'\n' | b'\r' if multiline => {
            let mut i = at;
            while input.get(i).is_some_and(|&b| is_whitespace(b)) {
                i += 1;
            }
            let nl = newline_len(input, i);
            if nl == 0 {
                return Err(if i == input.len() {
                    ErrorKind::Boundary
                } else {
                    ErrorKind::Lexical
                });
            }
            Ok(skip_blank(input, i + nl))
        }
        _ => Err(ErrorKind::Lexical),
    }
}

fn scan_unicode(input: &[u8], at: usize, digits: usize) -> Result<usize, ErrorKind> {
    for k in 0..digits {
        match input.get(at + k) {
            None => return Err(ErrorKind::Boundary),
            Some(&b) if !is_hex_digit(b) => return Err(ErrorKind::Lexical),
            Some(_) => {}
        }
    }
    match hex_scalar(&input[at..at + digits]) {
        Some(_) => Ok(at + digits),
        None => Err(ErrorKind::Lexical),
    }
}

/// Parses hex digits as a Unicode scalar value.
fn hex_scalar(hex: &[u8]) -> Option<char> {
    let mut value = 0u32;
    for &b in hex {
        if !is_hex_digit(b) {
            return None;
        }
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            _ => b - b'A' + 10,
        };
        value = value.checked_mul(16)?.checked_add(digit as u32)?;
    }
    char::from_u32(value)
}

/// Skips whitespace and newlines following a line-ending backslash.
fn skip_blank(input: &[u8], mut i: usize) -> usize {
    loop {
        match input.get(i) {
            Some(&b) if is_whitespace(b) => i += 1,
            _ => {
                let nl = newline_len(input, i);
                if nl == 0 {
                    return i;
                }
                i += nl;
            }
        }
    }
}

/// Decodes the content of a string that [`munch`] accepted.
///
/// Literal forms and basic content without backslashes are returned borrowed.
pub(crate) fn unescape(content: &[u8], style: StringStyle) -> Cow<'_, [u8]> {
    if !style.is_basic() || !content.contains(&b'\\') {
        return Cow::Borrowed(content);
    }
    let mut out = Vec::with_capacity(content.len());
    let mut i = 0;
    while i < content.len() {
        let b = content[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let Some(&esc) = content.get(i + 1) else {
            break;
        };
        i += 2;
        let simple = match esc {
            b'"' => b'"',
            b'\\' => b'\\',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' | b'U' => {
                let digits = if esc == b'u' { 4 } else { 8 };
                if let Some(ch) = content.get(i..i + digits).and_then(hex_scalar) {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
                i += digits;
                continue;
            }
            _ => {
                // Line-ending backslash.
                i = skip_blank(content, i - 1);
                continue;
            }
        };
        out.push(simple);
    }
    Cow::Owned(out)
}

/// Decodes string content to UTF-8 text.
///
/// Returns `None` only for content that did not come from [`munch`].
pub(crate) fn decode(content: &[u8], style: StringStyle) -> Option<Cow<'_, str>> {
    to_text(unescape(content, style))
}

pub(crate) fn to_text(bytes: Cow<'_, [u8]>) -> Option<Cow<'_, str>> {
    match bytes {
        Cow::Borrowed(bytes) => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
        Cow::Owned(bytes) => String::from_utf8(bytes).ok().map(Cow::Owned),
    }
}
