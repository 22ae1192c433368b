//! A collection of utility functions
use std::time::SystemTime;

use chrono::DateTime;
use chrono::Utc;

use crate::errors::Error;

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Formats a `SystemTime` into a RFC 3339 - Z format.
/// For example "2018-01-26T18:30:09.453Z"
pub fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Builds a `SystemTime` from a RFC 3339 - Z formatted string.
/// For example "2018-01-26T18:30:09.453Z"
pub fn parse_system_time(s: &str) -> Result<SystemTime, Error> {
    let datetime = DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::InvalidArgument(format!("system time '{s}': {e}")))?;
    Ok(SystemTime::from(datetime))
}

/// Formats a byte count using binary (1024) scaling.
///
/// The smallest unit whose value drops below 1024 is used, TB otherwise.
/// Values are rounded to two decimals and printed without trailing zeros.
///
/// ```
/// use fsitem::utils::human_readable_size;
/// assert_eq!(human_readable_size(512), "512 B");
/// assert_eq!(human_readable_size(1536), "1.5 KB");
/// assert_eq!(human_readable_size(3 * 1024 * 1024), "3 MB");
/// ```
pub fn human_readable_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{} {}", round2(size), SIZE_UNITS[unit])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_in_every_unit() {
        assert_eq!(human_readable_size(0), "0 B");
        assert_eq!(human_readable_size(1023), "1023 B");
        assert_eq!(human_readable_size(1024), "1 KB");
        assert_eq!(human_readable_size(1234), "1.21 KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
        assert_eq!(human_readable_size(2 * 1024 * 1024 * 1024), "2 GB");
        assert_eq!(human_readable_size(1024u64.pow(4)), "1 TB");
        assert_eq!(human_readable_size(2048 * 1024u64.pow(4)), "2048 TB");
    }

    #[test]
    fn system_time_round_trip() {
        let formatted = "2018-01-26T18:30:09.453Z";
        let parsed = parse_system_time(formatted).unwrap();
        assert_eq!(format_system_time(parsed), formatted);
        assert!(parse_system_time("yesterday").is_err());
    }
}
