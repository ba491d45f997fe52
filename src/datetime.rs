//! RFC 3339 date-times as TOML restricts them.

use crate::arena::DatetimeKind;
use std::fmt;
use std::ops::RangeInclusive;

#[cfg(test)]
#[path = "./datetime_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    /// May be 60 for a leap second.
    pub second: u8,
    /// Fractional seconds, truncated to nanoseconds.
    pub nanosecond: u32,
    precision: u8,
}

impl Time {
    /// Fractional seconds truncated to milliseconds.
    pub fn millisecond(&self) -> u16 {
        (self.nanosecond / 1_000_000) as u16
    }

    /// Number of fractional digits written in the source, at most 9.
    pub fn subsecond_precision(&self) -> u8 {
        self.precision
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeOffset {
    /// `Z` or `z`: UTC.
    Z,
    /// Offset between local time and UTC
    Custom { minutes: i16 },
}

impl TimeOffset {
    pub fn minutes(self) -> i16 {
        match self {
            TimeOffset::Z => 0,
            TimeOffset::Custom { minutes } => minutes,
        }
    }
}

/// A decoded date-time value of any of the four variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datetime {
    date: Option<Date>,
    time: Option<Time>,
    offset: Option<TimeOffset>,
}

impl Datetime {
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    pub fn time(&self) -> Option<Time> {
        self.time
    }

    pub fn offset(&self) -> Option<TimeOffset> {
        self.offset
    }

    pub fn kind(&self) -> DatetimeKind {
        match (self.date, self.time, self.offset) {
            (Some(_), Some(_), Some(_)) => DatetimeKind::OffsetDateTime,
            (Some(_), Some(_), None) => DatetimeKind::LocalDateTime,
            (Some(_), None, _) => DatetimeKind::LocalDate,
            (None, _, _) => DatetimeKind::LocalTime,
        }
    }

    /// Milliseconds since the Unix epoch, for offset date-times only.
    ///
    /// A leap second is counted as the first second of the next minute.
    pub fn unix_millis(&self) -> Option<i64> {
        let (Some(date), Some(time), Some(offset)) = (self.date, self.time, self.offset) else {
            return None;
        };
        let days = days_from_civil(date.year as i64, date.month as i64, date.day as i64);
        let seconds = days * 86_400
            + time.hour as i64 * 3_600
            + time.minute as i64 * 60
            + time.second as i64
            - offset.minutes() as i64 * 60;
        Some(seconds * 1_000 + time.millisecond() as i64)
    }

    /// Scans a date-time at the start of `input`.
    ///
    /// Returns the number of bytes consumed. Whatever follows is left to the
    /// caller to check.
    pub(crate) fn munch(input: &[u8]) -> Option<(usize, Datetime)> {
        let mut scan = Scanner { input, pos: 0 };
        let mut value = Datetime {
            date: None,
            time: None,
            offset: None,
        };
        if input.get(2) != Some(&b':') {
            value.date = Some(scan.date()?);
            // `T`, `t`, or a single space directly followed by a time.
            let delimited = match scan.peek() {
                Some(b'T' | b't') => true,
                Some(b' ') => input.get(scan.pos + 1).is_some_and(u8::is_ascii_digit),
                _ => false,
            };
            if !delimited {
                return Some((scan.pos, value));
            }
            scan.pos += 1;
        }
        value.time = Some(scan.time()?);
        value.offset = scan.offset()?;
        if value.date.is_none() && value.offset.is_some() {
            return None;
        }
        Some((scan.pos, value))
    }
}

/// Cursor over the fixed-width fields of a date-time literal.
struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> Option<()> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    /// Exactly `width` digits, not followed by another digit, within `range`.
    fn field(&mut self, width: usize, range: RangeInclusive<u32>) -> Option<u32> {
        let digits = self.input.get(self.pos..self.pos + width)?;
        let mut value = 0u32;
        for &b in digits {
            if !b.is_ascii_digit() {
                return None;
            }
            value = value * 10 + (b - b'0') as u32;
        }
        let overlong = self
            .input
            .get(self.pos + width)
            .is_some_and(u8::is_ascii_digit);
        if overlong || !range.contains(&value) {
            return None;
        }
        self.pos += width;
        Some(value)
    }

    fn date(&mut self) -> Option<Date> {
        let year = self.field(4, 0..=9999)?;
        self.eat(b'-')?;
        let month = self.field(2, 1..=12)?;
        self.eat(b'-')?;
        // No calendar check beyond 31.
        let day = self.field(2, 1..=31)?;
        Some(Date {
            year: year as u16,
            month: month as u8,
            day: day as u8,
        })
    }

    fn time(&mut self) -> Option<Time> {
        let hour = self.field(2, 0..=23)?;
        self.eat(b':')?;
        let minute = self.field(2, 0..=59)?;
        self.eat(b':')?;
        let second = self.field(2, 0..=60)?;
        let mut time = Time {
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            nanosecond: 0,
            precision: 0,
        };
        if self.eat(b'.').is_some() {
            let start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            let digits = &self.input[start..self.pos];
            if digits.is_empty() {
                return None;
            }
            // Digits past nanoseconds are dropped.
            let kept = &digits[..digits.len().min(9)];
            let mut nanos = 0u32;
            for &b in kept {
                nanos = nanos * 10 + (b - b'0') as u32;
            }
            time.nanosecond = nanos * 10u32.pow(9 - kept.len() as u32);
            time.precision = kept.len() as u8;
        }
        Some(time)
    }

    /// `Z`, `+HH:MM`, `-HH:MM`, or nothing at all.
    fn offset(&mut self) -> Option<Option<TimeOffset>> {
        let sign: i16 = match self.peek() {
            Some(b'Z' | b'z') => {
                self.pos += 1;
                return Some(Some(TimeOffset::Z));
            }
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Some(None),
        };
        self.pos += 1;
        let hour = self.field(2, 0..=23)?;
        self.eat(b':')?;
        let minute = self.field(2, 0..=59)?;
        Some(Some(TimeOffset::Custom {
            minutes: sign * (hour * 60 + minute) as i16,
        }))
    }
}

/// Days between 1970-01-01 and the given proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.date {
            write!(f, "{:04}-{:02}-{:02}", date.year, date.month, date.day)?;
            if self.time.is_some() {
                f.write_str("T")?;
            }
        }
        if let Some(time) = self.time {
            write!(f, "{:02}:{:02}:{:02}", time.hour, time.minute, time.second)?;
            if time.precision > 0 {
                let digits = format!("{:09}", time.nanosecond);
                write!(f, ".{}", &digits[..time.precision as usize])?;
            }
        }
        match self.offset {
            None => Ok(()),
            Some(TimeOffset::Z) => f.write_str("Z"),
            Some(TimeOffset::Custom { minutes }) => {
                let sign = if minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
            }
        }
    }
}
