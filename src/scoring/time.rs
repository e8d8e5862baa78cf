/// Result of a lenient parse. Malformed input never fails, it falls back to
/// zero, but callers can still tell the two cases apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    Parsed(f64),
    Defaulted,
}

impl ParsedValue {
    /// Numeric value, `0.0` when the input was defaulted
    pub fn value(self) -> f64 {
        match self {
            ParsedValue::Parsed(v) => v,
            ParsedValue::Defaulted => 0.0,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, ParsedValue::Defaulted)
    }
}

/// Parse a finite number, rejecting empty strings, `NaN` and infinities.
fn parse_finite(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a time value into minutes.
///
/// Accepted forms, checked in order:
/// - `"m:ss"` (minutes and seconds; parts after a second `:` are ignored)
/// - `"mss"` / `"mmss"`: three or four digits, the last two are seconds
/// - any plain number, taken as minutes
///
/// Anything else yields [`ParsedValue::Defaulted`].
pub fn parse_time(input: &str) -> ParsedValue {
    let t = input.trim();
    if t.is_empty() {
        return ParsedValue::Defaulted;
    }

    if t.contains(':') {
        // Only the first two parts count: "1:2:3" is 1 minute 2 seconds
        let mut parts = t.split(':');
        let minutes = parts.next().and_then(parse_finite);
        let seconds = parts.next().and_then(parse_finite);
        return match (minutes, seconds) {
            (Some(m), Some(s)) => ParsedValue::Parsed(m + s / 60.0),
            _ => ParsedValue::Defaulted,
        };
    }

    // "130" is 1:30, not 130 minutes
    if (3..=4).contains(&t.len()) && t.bytes().all(|b| b.is_ascii_digit()) {
        let (minutes, seconds) = t.split_at(t.len() - 2);
        if let (Some(m), Some(s)) = (parse_finite(minutes), parse_finite(seconds)) {
            return ParsedValue::Parsed(m + s / 60.0);
        }
    }

    match parse_finite(t) {
        Some(v) => ParsedValue::Parsed(v),
        None => ParsedValue::Defaulted,
    }
}

/// Convenience wrapper over [`parse_time`] returning only the minutes.
pub fn parse_time_to_minutes(input: &str) -> f64 {
    parse_time(input).value()
}

/// Parse a plain numeric measurement (jump distance, push-up count, ...).
/// Empty or non-numeric input is defaulted to zero.
pub fn parse_measurement(input: &str) -> ParsedValue {
    match parse_finite(input) {
        Some(v) => ParsedValue::Parsed(v),
        None => ParsedValue::Defaulted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_format() {
        assert_eq!(parse_time_to_minutes("1:30"), 1.5);
        assert_eq!(parse_time_to_minutes("3:45"), 3.75);
        assert_eq!(parse_time_to_minutes(" 4 : 00 "), 4.0);
    }

    #[test]
    fn test_compact_format() {
        assert_eq!(parse_time_to_minutes("130"), 1.5);
        assert_eq!(parse_time_to_minutes("1230"), 12.5);
        assert_eq!(parse_time("100"), ParsedValue::Parsed(1.0));
    }

    #[test]
    fn test_empty_is_defaulted() {
        assert_eq!(parse_time(""), ParsedValue::Defaulted);
        assert_eq!(parse_time("   "), ParsedValue::Defaulted);
        assert_eq!(parse_time_to_minutes(""), 0.0);
    }

    #[test]
    fn test_garbage_is_defaulted() {
        assert_eq!(parse_time("abc"), ParsedValue::Defaulted);
        assert_eq!(parse_time_to_minutes("abc"), 0.0);
        assert!(parse_time("1:xx").is_defaulted());
        assert!(parse_time("x:30").is_defaulted());
        assert!(parse_time("1:").is_defaulted());
    }

    #[test]
    fn test_extra_colon_parts_are_ignored() {
        let minutes = parse_time_to_minutes("1:2:3");
        assert!((minutes - (1.0 + 2.0 / 60.0)).abs() < 1e-9);
        assert_eq!(parse_time("2:30:junk"), ParsedValue::Parsed(2.5));
        assert!(parse_time("x:30:00").is_defaulted());
    }

    #[test]
    fn test_plain_minutes() {
        assert_eq!(parse_time("4.5"), ParsedValue::Parsed(4.5));
        assert_eq!(parse_time("12"), ParsedValue::Parsed(12.0));
        // Five digits is not the compact form
        assert_eq!(parse_time("12345"), ParsedValue::Parsed(12345.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(parse_time("NaN").is_defaulted());
        assert!(parse_time("inf").is_defaulted());
        assert!(parse_measurement("-inf").is_defaulted());
    }

    #[test]
    fn test_parse_measurement() {
        assert_eq!(parse_measurement("2.35"), ParsedValue::Parsed(2.35));
        assert_eq!(parse_measurement("").value(), 0.0);
        assert_eq!(parse_measurement("muchas").value(), 0.0);
    }
}
