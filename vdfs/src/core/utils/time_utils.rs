// SPDX-License-Identifier: MIT

//! Time utilities for filesystem timestamps.
//!
//! On-disk timestamps are unix seconds stored as `i32`.
//!
//! - In `std` mode, uses system clock.
//! - Without `std`, returns UNIX_EPOCH as fixed timestamp.

use time::OffsetDateTime;

/// Returns the current UTC time.
pub fn now_utc() -> OffsetDateTime {
    #[cfg(feature = "std")]
    {
        OffsetDateTime::now_utc()
    }

    #[cfg(not(feature = "std"))]
    {
        OffsetDateTime::UNIX_EPOCH
    }
}

/// Current time as on-disk unix seconds, saturating at `i32::MAX`.
pub fn now_unix() -> i32 {
    i32::try_from(now_utc().unix_timestamp()).unwrap_or(i32::MAX)
}

/// Formats on-disk unix seconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_unix(secs: i32) -> String {
    match OffsetDateTime::from_unix_timestamp(secs as i64) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            dt.year(),
            dt.month() as u8,
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        Err(_) => "-".to_string(),
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_now_unix_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_unix() > 1_577_836_800);
    }

    #[test]
    fn test_format_unix() {
        assert_eq!(format_unix(0), "1970-01-01 00:00:00");
        assert_eq!(format_unix(1_700_000_000), "2023-11-14 22:13:20");
    }
}
