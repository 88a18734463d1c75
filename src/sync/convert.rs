//! Unit and format conversions between the config form and the wire.

/// Parse the leading base-10 integer of `input`.
///
/// Leading whitespace is skipped and an optional sign is accepted; parsing
/// stops at the first non-digit. `"12abc"` is 12, `"1.9"` is 1, `"abc"` and
/// `""` have no value.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a form number, falling back when it has no value or is zero.
pub fn int_or(input: &str, fallback: i64) -> i64 {
    match parse_leading_int(input) {
        Some(0) | None => fallback,
        Some(n) => n,
    }
}

/// A stored number, falling back when it is absent or zero.
pub fn stored_or(value: Option<i64>, fallback: i64) -> i64 {
    match value {
        Some(0) | None => fallback,
        Some(n) => n,
    }
}

/// Seconds to whole minutes, rounding down.
pub fn seconds_to_minutes(seconds: i64) -> i64 {
    seconds.div_euclid(60)
}

pub fn minutes_to_seconds(minutes: i64) -> i64 {
    minutes.saturating_mul(60)
}

/// A stored value of 1 to 59 seconds, which displays as `0` minutes.
pub fn sub_minute(seconds: i64) -> Option<i64> {
    (1..60).contains(&seconds).then_some(seconds)
}

/// Loop-rest minutes from the form as seconds. A field still showing the `0`
/// it was loaded with saves the sub-minute value behind it.
pub fn loop_rest_seconds(text: &str, sub_minute: Option<i64>, fallback_minutes: i64) -> i64 {
    match sub_minute {
        Some(seconds) if text.trim() == "0" => seconds,
        _ => minutes_to_seconds(int_or(text, fallback_minutes)),
    }
}

/// Split the multi-line URL field: one entry per line, trimmed, blank lines
/// dropped, order kept.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
