//! Fixed-offset clock shared by stored timestamps, ticket ids and notifications.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{DatabaseError, Result};

/// Support desk local offset (UTC+8).
pub const SUPPORT_OFFSET: FixedOffset = match FixedOffset::east_opt(8 * 3600) {
    Some(offset) => offset,
    None => panic!("invalid support offset"),
};

/// Current time in the support desk offset.
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&SUPPORT_OFFSET)
}

/// Format a timestamp for storage.
///
/// Fixed width with microseconds, so lexical order matches chronological
/// order for every value written by this crate.
pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
}

/// Parse a stored timestamp.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|_| DatabaseError::InvalidValue {
        field: "timestamp",
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_uses_support_offset() {
        assert_eq!(now().offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_timestamp_roundtrip_keeps_offset() {
        let at = SUPPORT_OFFSET
            .with_ymd_and_hms(2025, 1, 5, 23, 30, 0)
            .unwrap();
        let stored = format_timestamp(&at);
        assert_eq!(stored, "2025-01-05T23:30:00.000000+08:00");
        assert_eq!(parse_timestamp(&stored).unwrap(), at);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(DatabaseError::InvalidValue { field: "timestamp", .. })
        ));
    }
}
