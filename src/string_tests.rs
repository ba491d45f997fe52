use super::*;

/// Scans `input` as a complete literal and decodes its content.
#[track_caller]
fn scan_ok(input: &str) -> (StringStyle, String) {
    let bytes = input.as_bytes();
    let token = munch(bytes, 0).unwrap_or_else(|e| panic!("scan failed for {input:?}: {e}"));
    assert_eq!(token.end, bytes.len(), "consumed wrong amount for {input:?}");
    let content = token.content.slice(bytes).unwrap();
    let text = decode(content, token.style).unwrap();
    (token.style, text.into_owned())
}

#[track_caller]
fn scan_err(input: &str) -> ErrorKind {
    match munch(input.as_bytes(), 0) {
        Ok(token) => panic!("expected failure for {input:?}, got {token:?}"),
        Err(e) => e,
    }
}

#[test]
fn single_line_forms() {
    let cases = [
        (r#""hello""#, StringStyle::Basic, "hello"),
        (r#""""#, StringStyle::Basic, ""),
        ("''", StringStyle::Literal, ""),
        (r"'C:\Users\nodejs'", StringStyle::Literal, r"C:\Users\nodejs"),
        ("\"tab\there\"", StringStyle::Basic, "tab\there"),
        (r#""caf\u00E9""#, StringStyle::Basic, "café"),
        ("\"café\"", StringStyle::Basic, "café"),
    ];
    for (input, style, expected) in cases {
        assert_eq!(scan_ok(input), (style, expected.to_string()), "input: {input}");
    }
}

#[test]
fn basic_escapes() {
    let cases = [
        (r#""a\"b""#, "a\"b"),
        (r#""a\\b""#, "a\\b"),
        (r#""\b\f\n\r\t""#, "\u{8}\u{c}\n\r\t"),
        (r#""\u0041""#, "A"),
        (r#""\U0001F600""#, "😀"),
        (r#""\u00e9\u00C9""#, "éÉ"),
    ];
    for (input, expected) in cases {
        assert_eq!(scan_ok(input).1, expected, "input: {input}");
    }
}

#[test]
fn bad_escapes() {
    let cases = [
        r#""\x41""#,
        r#""\e""#,
        r#""\u12""#,
        r#""\uD800""#,
        r#""\U00110000""#,
        r#""\uZZZZ""#,
        // line-ending backslash only in multi-line strings
        "\"a\\\nb\"",
    ];
    for input in cases {
        assert_ne!(scan_err(input), ErrorKind::Boundary, "input: {input}");
    }
}

#[test]
fn unterminated_hits_boundary() {
    let cases = ["\"abc", "'abc", "\"\"\"abc\"\"", "'''abc", "\"abc\\"];
    for input in cases {
        assert_eq!(scan_err(input), ErrorKind::Boundary, "input: {input}");
    }
}

#[test]
fn newline_in_single_line_string() {
    assert_eq!(scan_err("\"a\nb\""), ErrorKind::Structural);
    assert_eq!(scan_err("'a\r\nb'"), ErrorKind::Structural);
    assert_eq!(scan_err("\"a\rb\""), ErrorKind::Lexical);
}

#[test]
fn control_characters_rejected() {
    for input in ["\"a\u{0}b\"", "'a\u{1f}b'", "\"a\u{7f}b\"", "'''a\u{7f}'''"] {
        assert_eq!(scan_err(input), ErrorKind::Lexical, "input: {input:?}");
    }
}

#[test]
fn invalid_utf8_rejected() {
    let inputs: [&[u8]; 3] = [b"\"\xC3\x28\"", b"'\xED\xA0\x80'", b"\"\x80\""];
    for input in inputs {
        assert_eq!(munch(input, 0), Err(ErrorKind::Lexical), "input: {input:02X?}");
    }
}

#[test]
fn multiline_trims_first_newline() {
    let cases = [
        ("\"\"\"\nhello\nworld\"\"\"", "hello\nworld"),
        ("'''\nhello\nworld'''", "hello\nworld"),
        ("\"\"\"\r\nhello\"\"\"", "hello"),
        ("\"\"\"\n\nhello\"\"\"", "\nhello"),
        ("'''no newline'''", "no newline"),
    ];
    for (input, expected) in cases {
        assert_eq!(scan_ok(input).1, expected, "input: {input:?}");
    }
}

#[test]
fn multiline_quote_runs() {
    let cases = [
        (r#""""ab""""""#, "ab\"\""),
        (r#""""ab"""""#, "ab\""),
        (r#""""""""#, ""),
        (r#""""a"b""c""""#, "a\"b\"\"c"),
        (r#""""""a""""#, "\"\"a"),
        ("'''ab'''''", "ab''"),
        ("''''''", ""),
        ("''''a'''", "'a"),
    ];
    for (input, expected) in cases {
        assert_eq!(scan_ok(input).1, expected, "input: {input}");
    }

    // six quotes after content is one too many
    assert_eq!(scan_err(r#""""ab"""""""#), ErrorKind::Lexical);
}

#[test]
fn line_ending_backslash() {
    let cases = [
        ("\"\"\"a\\\n   b\"\"\"", "ab"),
        ("\"\"\"a\\   \n\n\t  b\"\"\"", "ab"),
        ("\"\"\"a\\\r\n  b\"\"\"", "ab"),
        ("\"\"\"\\\n  The quick \\\n  fox.\\\n  \"\"\"", "The quick fox."),
        ("\"\"\"a\\\n\"\"\"", "a"),
    ];
    for (input, expected) in cases {
        assert_eq!(scan_ok(input).1, expected, "input: {input:?}");
    }

    // whitespace after the backslash must reach a newline
    assert_eq!(scan_err("\"\"\"a\\  b\"\"\""), ErrorKind::Lexical);
}

#[test]
fn multiline_keeps_crlf() {
    assert_eq!(scan_ok("'''a\r\nb'''").1, "a\r\nb");
}

#[test]
fn decoding_borrows_without_escapes() {
    let content = b"plain text";
    assert!(matches!(
        unescape(content, StringStyle::Basic),
        Cow::Borrowed(_)
    ));
    assert!(matches!(
        unescape(br"back\slash", StringStyle::Literal),
        Cow::Borrowed(_)
    ));
    assert!(matches!(unescape(br"a\n", StringStyle::Basic), Cow::Owned(_)));
}

#[test]
fn scanning_stops_at_closing_delimiter() {
    let input = br#""abc" = 1"#;
    let token = munch(input, 0).unwrap();
    assert_eq!(token.end, 5);
    assert_eq!(token.content, Span::new(1, 4));
}
