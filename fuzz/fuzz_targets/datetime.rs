#![no_main]

use libfuzzer_sys::fuzz_target;
use toml_handles::Parser;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.contains(['\n', '\r', '#']) {
        return;
    }
    let input = format!("v = {text}");
    let mut parser = Parser::new();
    let Some(dt) = parser
        .try_parse(input.as_bytes())
        .ok()
        .and_then(|root| root.get_datetime("v"))
    else {
        return;
    };
    let formatted = format!("v = {dt}");
    let mut reparsed = Parser::new();
    let out = reparsed
        .try_parse(formatted.as_bytes())
        .unwrap()
        .get_datetime("v")
        .unwrap();
    assert_eq!(dt.date(), out.date());
    assert_eq!(dt.time(), out.time());
    assert_eq!(dt.offset(), out.offset());
});
