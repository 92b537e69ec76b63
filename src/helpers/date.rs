//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// Format a date using a Moment.js-compatible format string
///
/// Text inside `[...]` is emitted literally.
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        if rest.starts_with("Do") {
            out.push_str(&ordinal(date.day()));
            rest = &rest[2..];
            continue;
        }

        let run = rest.chars().take_while(|&x| x == c).count();
        match token_spec(c, run) {
            Some((spec, used)) => {
                out.push_str(&date.format(spec).to_string());
                rest = &rest[used..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

/// Map a run of `count` repeated `c` characters to a chrono specifier.
/// Returns the specifier and how many bytes of the run it consumed.
fn token_spec(c: char, count: usize) -> Option<(&'static str, usize)> {
    let spec = match (c, count) {
        ('Y', n) if n >= 4 => ("%Y", 4),
        ('Y', 2..=3) => ("%y", 2),
        ('M', n) if n >= 4 => ("%B", 4),
        ('M', 3) => ("%b", 3),
        ('M', 2) => ("%m", 2),
        ('M', 1) => ("%-m", 1),
        ('D', n) if n >= 4 => ("%j", 4),
        ('D', 2..=3) => ("%d", 2),
        ('D', 1) => ("%-d", 1),
        ('d', n) if n >= 4 => ("%A", 4),
        ('d', 3) => ("%a", 3),
        ('H', n) if n >= 2 => ("%H", 2),
        ('H', 1) => ("%-H", 1),
        ('h', n) if n >= 2 => ("%I", 2),
        ('h', 1) => ("%-I", 1),
        ('m', n) if n >= 2 => ("%M", 2),
        ('m', 1) => ("%-M", 1),
        ('s', n) if n >= 2 => ("%S", 2),
        ('s', 1) => ("%-S", 1),
        ('S', n) if n >= 3 => ("%3f", 3),
        ('A', _) => ("%p", 1),
        ('a', _) => ("%P", 1),
        ('Z', n) if n >= 2 => ("%z", 2),
        ('Z', 1) => ("%:z", 1),
        _ => return None,
    };
    Some(spec)
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "YYYY/MM/DD"), "2024/01/15");
        assert_eq!(format_date(&date, "MMMM DD, YYYY"), "January 15, 2024");
        assert_eq!(format_date(&date, "MMM D, YY"), "Jan 15, 24");
        assert_eq!(format_date(&date, "HH:mm:ss"), "10:30:00");
    }

    #[test]
    fn test_default_query_format() {
        let date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date, "MMMM DD, YYYY"), "January 01, 2020");
    }

    #[test]
    fn test_weekday_ordinal_and_literals() {
        let date = Utc.with_ymd_and_hms(2024, 3, 2, 15, 4, 0).unwrap();
        assert_eq!(format_date(&date, "dddd, MMMM Do"), "Saturday, March 2nd");
        assert_eq!(format_date(&date, "[Day] D [of] M"), "Day 2 of 3");
        assert_eq!(format_date(&date, "h:mm A"), "3:04 PM");
    }

    #[test]
    fn test_ordinal_teens() {
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(23), "23rd");
    }

    #[test]
    fn test_date_xml() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let date = tz.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(date_xml(&date), "2024-01-15T10:30:00+01:00");
    }
}
