//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as an RFC 3339 string with millisecond precision
pub fn now_iso8601() -> String {
    now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_now_iso8601_parses_back() {
        let stamp = now_iso8601();
        assert!(stamp.ends_with('Z'));

        let parsed = DateTime::parse_from_rfc3339(&stamp);
        assert!(parsed.is_ok(), "Not RFC 3339: {}", stamp);
    }
}
