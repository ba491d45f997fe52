//! Byte and code point predicates shared by the scanners.

#[cfg(test)]
#[path = "./classify_tests.rs"]
mod tests;

#[inline]
pub fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
pub fn is_oct_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

#[inline]
pub fn is_bin_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

/// Space or tab. Newlines are handled separately.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Bytes allowed in an unquoted key.
#[inline]
pub fn is_keylike(b: u8) -> bool {
    is_alpha(b) || is_digit(b) || b == b'-' || b == b'_'
}

/// Control characters other than tab, including DEL.
#[inline]
pub fn is_control(b: u8) -> bool {
    (b < 0x20 && b != b'\t') || b == 0x7F
}

/// Length of the newline starting at `at`: 1 for LF, 2 for CRLF, 0 otherwise.
/// A lone CR is not a newline.
#[inline]
pub fn newline_len(input: &[u8], at: usize) -> usize {
    match input.get(at) {
        Some(b'\n') => 1,
        Some(b'\r') if input.get(at + 1) == Some(&b'\n') => 2,
        _ => 0,
    }
}

/// Bytes that may legally follow a scalar value.
#[inline]
pub fn is_end_of_value(b: Option<u8>) -> bool {
    match b {
        None => true,
        Some(b) => matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'#' | b',' | b']' | b'}'),
    }
}

/// Code points accepted by the `non-ascii` production.
#[inline]
pub fn is_non_ascii(cp: u32) -> bool {
    (0x80..=0xD7FF).contains(&cp) || (0xE000..=0x10FFFF).contains(&cp)
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Decodes the multi-byte UTF-8 sequence starting at `at`.
///
/// Returns the code point and the number of bytes it occupies. Sequences with
/// a bad lead or continuation byte, overlong encodings, surrogates, and code
/// points past U+10FFFF all yield `None`. ASCII bytes are not handled here.
pub fn decode_utf8(input: &[u8], at: usize) -> Option<(u32, usize)> {
    let lead = *input.get(at)?;
    let (len, init, min) = match lead {
        0xC0..=0xDF => (2, (lead & 0x1F) as u32, 0x80),
        0xE0..=0xEF => (3, (lead & 0x0F) as u32, 0x800),
        0xF0..=0xF7 => (4, (lead & 0x07) as u32, 0x10000),
        _ => return None,
    };
    let tail = input.get(at + 1..at + len)?;
    let mut cp = init;
    for &b in tail {
        if !is_continuation(b) {
            return None;
        }
        cp = (cp << 6) | (b & 0x3F) as u32;
    }
    if cp < min || !is_non_ascii(cp) {
        return None;
    }
    Some((cp, len))
}
