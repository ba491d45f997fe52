//! Integer and float literals.
//!
//! Integers are decoded while scanning because overflow is a parse error.
//! Floats are only validated; [`decode_float`] turns the source text into an
//! `f64` when a reader asks for it.

use crate::ErrorKind;
use crate::arena::FloatClass;
use crate::classify::{is_bin_digit, is_digit, is_end_of_value, is_hex_digit, is_oct_digit};

#[cfg(test)]
#[path = "./number_tests.rs"]
mod tests;

#[derive(Copy, Clone, PartialEq, Debug)]
pub(crate) enum Number {
    Integer(i64),
    Float(FloatClass),
}

/// Scans the number starting at `start`; returns the offset after it.
pub(crate) fn munch(input: &[u8], start: usize) -> Result<(usize, Number), ErrorKind> {
    let mut i = start;
    let mut negative = false;
    let signed = match input.get(i) {
        Some(b'+') => true,
        Some(b'-') => {
            negative = true;
            true
        }
        _ => false,
    };
    if signed {
        i += 1;
    }

    let special = match input.get(i..i + 3) {
        Some(b"inf") => Some(FloatClass::Infinity),
        Some(b"nan") => Some(FloatClass::Nan),
        _ => None,
    };
    if let Some(class) = special {
        return finish(input, i + 3, Number::Float(class));
    }

    if !signed && input.get(i) == Some(&b'0') {
        let radix = match input.get(i + 1) {
            Some(b'x') => Some((16, is_hex_digit as fn(u8) -> bool)),
            Some(b'o') => Some((8, is_oct_digit as fn(u8) -> bool)),
            Some(b'b') => Some((2, is_bin_digit as fn(u8) -> bool)),
            _ => None,
        };
        if let Some((radix, is_radix_digit)) = radix {
            let digits_start = i + 2;
            let end = match digit_run(input, digits_start, is_radix_digit) {
                Ok(end) => end,
                Err(e) => return Err(e),
            };
            let value = match accumulate(&input[digits_start..end], radix, false) {
                Some(v) => v,
                None => return Err(ErrorKind::Semantic),
            };
            return finish(input, end, Number::Integer(value));
        }
    }

    let int_start = i;
    let int_end = match digit_run(input, int_start, is_digit) {
        Ok(end) => end,
        Err(e) => return Err(e),
    };
    if input[int_start] == b'0' && int_end - int_start > 1 {
        return Err(ErrorKind::Lexical);
    }
    i = int_end;

    let mut is_float = false;
    if input.get(i) == Some(&b'.') {
        i = match digit_run(input, i + 1, is_digit) {
            Ok(end) => end,
            Err(e) => return Err(e),
        };
        is_float = true;
    }
    if let Some(b'e' | b'E') = input.get(i) {
        i += 1;
        if let Some(b'+' | b'-') = input.get(i) {
            i += 1;
        }
        i = match digit_run(input, i, is_digit) {
            Ok(end) => end,
            Err(e) => return Err(e),
        };
        is_float = true;
    }

    if is_float {
        // 1e400 and friends are not representable.
        match decode_float(&input[start..i]) {
            Some(f) if f.is_finite() => {}
            _ => return Err(ErrorKind::Semantic),
        }
        return finish(input, i, Number::Float(FloatClass::Finite));
    }

    match accumulate(&input[int_start..int_end], 10, negative) {
        Some(value) => finish(input, i, Number::Integer(value)),
        None => Err(ErrorKind::Semantic),
    }
}

fn finish(input: &[u8], end: usize, number: Number) -> Result<(usize, Number), ErrorKind> {
    if is_end_of_value(input.get(end).copied()) {
        Ok((end, number))
    } else {
        Err(ErrorKind::Lexical)
    }
}

/// Scans digits with single underscores allowed strictly between them.
fn digit_run(
    input: &[u8],
    start: usize,
    is_radix_digit: fn(u8) -> bool,
) -> Result<usize, ErrorKind> {
    let mut i = start;
    match input.get(i) {
        Some(&b) if is_radix_digit(b) => i += 1,
        None => return Err(ErrorKind::Boundary),
        Some(_) => return Err(ErrorKind::Lexical),
    }
    loop {
        match input.get(i) {
            Some(&b) if is_radix_digit(b) => i += 1,
            Some(b'_') => match input.get(i + 1) {
                Some(&b) if is_radix_digit(b) => i += 2,
                _ => return Err(ErrorKind::Lexical),
            },
            _ => return Ok(i),
        }
    }
}

/// Accumulates digits into an `i64`, failing on overflow.
///
/// Works in negative space so that `i64::MIN` is reachable.
fn accumulate(digits: &[u8], radix: u32, negative: bool) -> Option<i64> {
    let mut acc: i64 = 0;
    for &b in digits {
        if b == b'_' {
            continue;
        }
        let digit = (b as char).to_digit(radix)? as i64;
        acc = acc.checked_mul(radix as i64)?.checked_sub(digit)?;
    }
    if negative { Some(acc) } else { acc.checked_neg() }
}

/// Decodes the source text of a float literal, including `inf` and `nan`.
pub fn decode_float(text: &[u8]) -> Option<f64> {
    let (negative, body) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };
    let value = match body {
        b"inf" => f64::INFINITY,
        b"nan" => f64::NAN,
        _ => {
            let cleaned: String = body
                .iter()
                .filter(|&&b| b != b'_')
                .map(|&b| b as char)
                .collect();
            match cleaned.parse::<f64>() {
                Ok(v) => v,
                Err(_) => return None,
            }
        }
    };
    Some(if negative { -value } else { value })
}
