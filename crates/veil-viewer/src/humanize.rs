//! Human-readable upload age and size.

use jiff::Timestamp;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const DAYS_PER_MONTH: f64 = 30.436875;
const DAYS_PER_YEAR: f64 = 365.2425;

/// Describes how long ago `then` was, seen from `now`.
///
/// Each unit is rounded to the nearest whole value before being compared
/// against its cutoff, so 89 seconds is still "a minute ago" and 90 seconds
/// is "2 minutes ago". Times in the future read as "a few seconds ago".
pub fn relative_time(then: Timestamp, now: Timestamp) -> String {
    let seconds = now.duration_since(then).as_secs_f64().max(0.0);
    let phrase = describe(seconds);
    format!("{phrase} ago")
}

fn describe(seconds: f64) -> String {
    let secs = seconds.round();
    if secs <= 44.0 {
        return "a few seconds".to_string();
    }
    if secs <= 89.0 {
        return "a minute".to_string();
    }

    let minutes = (seconds / MINUTE).round();
    if minutes <= 44.0 {
        return format!("{minutes} minutes");
    }
    if minutes <= 89.0 {
        return "an hour".to_string();
    }

    let hours = (seconds / HOUR).round();
    if hours <= 21.0 {
        return format!("{hours} hours");
    }
    if hours <= 35.0 {
        return "a day".to_string();
    }

    let days = seconds / DAY;
    let whole_days = days.round();
    if whole_days <= 25.0 {
        return format!("{whole_days} days");
    }
    if whole_days <= 45.0 {
        return "a month".to_string();
    }

    let months = (days / DAYS_PER_MONTH).round();
    if months <= 10.0 {
        return format!("{months} months");
    }
    if months <= 17.0 {
        return "a year".to_string();
    }

    format!("{} years", (days / DAYS_PER_YEAR).round().max(2.0))
}

/// Formats a byte count as kilobytes (1 KB = 1000 bytes) with at most
/// three decimals and no trailing zeros.
pub fn kilobytes(size: u64) -> String {
    let whole = size / 1000;
    let fraction = size % 1000;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{fraction:03}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn ago(seconds: i64) -> String {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        relative_time(now - SignedDuration::from_secs(seconds), now)
    }

    #[test]
    fn seconds_and_minutes() {
        assert_eq!(ago(0), "a few seconds ago");
        assert_eq!(ago(44), "a few seconds ago");
        assert_eq!(ago(45), "a minute ago");
        assert_eq!(ago(89), "a minute ago");
        assert_eq!(ago(90), "2 minutes ago");
        assert_eq!(ago(44 * 60), "44 minutes ago");
    }

    #[test]
    fn hours_and_days() {
        assert_eq!(ago(45 * 60), "an hour ago");
        assert_eq!(ago(3 * 3600), "3 hours ago");
        assert_eq!(ago(22 * 3600), "a day ago");
        assert_eq!(ago(3 * 86_400), "3 days ago");
        assert_eq!(ago(25 * 86_400), "25 days ago");
    }

    #[test]
    fn months_and_years() {
        assert_eq!(ago(30 * 86_400), "a month ago");
        assert_eq!(ago(100 * 86_400), "3 months ago");
        assert_eq!(ago(400 * 86_400), "a year ago");
        assert_eq!(ago(3 * 366 * 86_400), "3 years ago");
    }

    #[test]
    fn future_reads_as_now() {
        assert_eq!(ago(-30), "a few seconds ago");
    }

    #[test]
    fn kilobytes_trims_trailing_zeros() {
        assert_eq!(kilobytes(0), "0");
        assert_eq!(kilobytes(4), "0.004");
        assert_eq!(kilobytes(1500), "1.5");
        assert_eq!(kilobytes(2000), "2");
        assert_eq!(kilobytes(1_234_567), "1234.567");
    }
}
