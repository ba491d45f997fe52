use super::*;

#[track_caller]
fn roundtrip(input: &str) {
    let (amount, result) = Datetime::munch(input.as_bytes()).unwrap();
    assert_eq!(amount, input.len(), "consumed wrong amount for {input:?}");
    assert_eq!(result.to_string(), input, "roundtrip mismatch for {input:?}");
}

#[track_caller]
fn roundtrip_lossy(input: &str, expected: &str) {
    let (amount, result) = Datetime::munch(input.as_bytes()).unwrap();
    assert_eq!(amount, input.len(), "consumed wrong amount for {input:?}");
    assert_eq!(result.to_string(), expected, "roundtrip mismatch for {input:?}");
}

#[track_caller]
fn expect_err(input: &str) {
    let result = Datetime::munch(input.as_bytes());
    assert!(result.is_none(), "for {input:?}: {result:?}");
}

#[track_caller]
fn parse_ok(input: &str) -> (usize, Datetime) {
    Datetime::munch(input.as_bytes()).unwrap()
}

#[test]
fn perfect_roundtrip_examples() {
    let inputs = [
        "1979-05-27T07:32:00Z",
        "1979-05-27T00:32:00-07:00",
        "1979-05-27T00:32:00.999999-07:00",
        "2000-12-17T00:32:00.5+05:30",
        "1979-05-27T07:32:00",
        "1979-05-27T00:32:00.999999",
        "1979-05-27",
        "07:32:00",
        "00:32:00.999999",
    ];
    for input in inputs {
        roundtrip(input);
    }
}

#[test]
fn lossy_roundtrip() {
    roundtrip_lossy("1979-05-27 07:32:00Z", "1979-05-27T07:32:00Z");
    roundtrip_lossy("1979-05-27t07:32:00z", "1979-05-27T07:32:00Z");
    roundtrip_lossy("1979-05-27T07:32:00+00:00", "1979-05-27T07:32:00+00:00");
    roundtrip_lossy("07:32:00.1234567891", "07:32:00.123456789");
}

#[test]
fn variant_kinds() {
    let cases = [
        ("1979-05-27T07:32:00Z", DatetimeKind::OffsetDateTime),
        ("1979-05-27T07:32:00+01:00", DatetimeKind::OffsetDateTime),
        ("1979-05-27T07:32:00", DatetimeKind::LocalDateTime),
        ("1979-05-27 07:32:00", DatetimeKind::LocalDateTime),
        ("1979-05-27", DatetimeKind::LocalDate),
        ("07:32:00", DatetimeKind::LocalTime),
    ];
    for (input, kind) in cases {
        assert_eq!(parse_ok(input).1.kind(), kind, "input: {input}");
    }
}

#[test]
fn field_bounds() {
    roundtrip("2024-01-31");
    roundtrip("2024-12-01");
    roundtrip("23:59:59");
    roundtrip("23:59:60");
    roundtrip("00:00:00");
    // Days are only checked against 31.
    roundtrip("2023-02-31");

    let bad = [
        "2024-00-01",
        "2024-13-01",
        "2024-01-00",
        "2024-01-32",
        "24:00:00",
        "23:60:00",
        "23:59:61",
        "1979-05-27T07:32:00+24:00",
        "1979-05-27T07:32:00+05:60",
    ];
    for input in bad {
        expect_err(input);
    }
}

#[test]
fn seconds_are_required() {
    expect_err("07:32");
    expect_err("1979-05-27T07:32");
    expect_err("1979-05-27T07:32Z");
}

#[test]
fn time_only_rejects_offset() {
    expect_err("07:32:00Z");
    expect_err("07:32:00+01:00");
}

#[test]
fn malformed_shapes() {
    let bad = [
        "", "1979", "1979-5-27", "79-05-27", "1979/05/27", "1979-05-2", "7:32:00", "07:3:00",
        "07:32:0", "07:32:00.", "1979-05-27T", "1979-05-27T07:32:00+05", "abcd-ef-gh",
        "1979-05-271", "07:32:001", "19790-05-27", "1979-05-27T07:32:00+05:001",
    ];
    for input in bad {
        expect_err(input);
    }
}

#[test]
fn stops_before_trailing_bytes() {
    let cases = [
        ("1979-05-27 # comment", 10),
        ("1979-05-27, 1", 10),
        ("07:32:00]", 8),
        ("1979-05-27T07:32:00Z\n", 20),
        ("1979-05-27T07:32:00-07:00}", 25),
    ];
    for (input, len) in cases {
        assert_eq!(parse_ok(input).0, len, "input: {input:?}");
    }
}

#[test]
fn accessors() {
    let (_, dt) = parse_ok("1979-05-27T00:32:00.999999-07:00");
    assert_eq!(
        dt.date(),
        Some(Date {
            year: 1979,
            month: 5,
            day: 27
        })
    );
    let time = dt.time().unwrap();
    assert_eq!((time.hour, time.minute, time.second), (0, 32, 0));
    assert_eq!(time.nanosecond, 999_999_000);
    assert_eq!(time.millisecond(), 999);
    assert_eq!(time.subsecond_precision(), 6);
    assert_eq!(dt.offset(), Some(TimeOffset::Custom { minutes: -420 }));

    let (_, dt) = parse_ok("07:32:00");
    assert_eq!(dt.date(), None);
    assert_eq!(dt.offset(), None);
}

#[test]
fn unix_millis() {
    let cases = [
        ("1970-01-01T00:00:00Z", 0),
        ("1970-01-01T00:00:01.5Z", 1_500),
        ("1979-05-27T07:32:00Z", 296_638_320_000),
        ("1979-05-27T00:32:00-07:00", 296_638_320_000),
        ("2000-03-01T00:00:00+00:00", 951_868_800_000),
        ("1969-12-31T23:59:59Z", -1_000),
    ];
    for (input, millis) in cases {
        assert_eq!(parse_ok(input).1.unix_millis(), Some(millis), "input: {input}");
    }
    assert_eq!(parse_ok("1979-05-27T07:32:00").1.unix_millis(), None);
    assert_eq!(parse_ok("1979-05-27").1.unix_millis(), None);
}

#[test]
fn randomized_roundtrip() {
    let mut rng = oorandom::Rand32::new(7);
    for _ in 0..2000 {
        let year = rng.rand_u32() % 10000;
        let month = rng.rand_u32() % 12 + 1;
        let day = rng.rand_u32() % 28 + 1;
        let hour = rng.rand_u32() % 24;
        let minute = rng.rand_u32() % 60;
        let second = rng.rand_u32() % 60;
        let date = format!("{year:04}-{month:02}-{day:02}");
        let time = format!("{hour:02}:{minute:02}:{second:02}");
        roundtrip(&date);
        roundtrip(&time);
        roundtrip(&format!("{date}T{time}"));
        let off = rng.rand_u32() % (24 * 60);
        let sign = if rng.rand_u32() % 2 == 0 { '+' } else { '-' };
        if off == 0 {
            roundtrip(&format!("{date}T{time}Z"));
        } else {
            roundtrip(&format!("{date}T{time}{sign}{:02}:{:02}", off / 60, off % 60));
        }
    }
}
