#![no_main]

use libfuzzer_sys::fuzz_target;
use toml_handles::{Parser, ValueProxy};

fn walk(value: ValueProxy<'_, '_>) {
    if let Some(table) = value.as_table() {
        for (_, child) in table {
            walk(child);
        }
    } else if let Some(array) = value.as_array() {
        for child in array {
            walk(child);
        }
    } else {
        std::hint::black_box((
            value.as_str(),
            value.as_int(),
            value.as_float(),
            value.as_bool(),
            value.as_datetime(),
        ));
    }
}

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new();
    let ok = parser.parse(data);
    let mut again = Parser::new();
    assert_eq!(again.parse(data), ok);
    let Some(root) = parser.root() else {
        return;
    };
    // Accepted input is valid UTF-8.
    assert!(std::str::from_utf8(data).is_ok());
    assert_eq!(parser.arena().nodes(), again.arena().nodes());
    for (_, value) in root {
        walk(value);
    }
});
