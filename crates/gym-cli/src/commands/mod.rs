// Console commands

pub mod classes;
pub mod lookups;
pub mod login;
pub mod members;
pub mod seed;

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a calendar day (`YYYY-MM-DD`) as midnight UTC
pub fn parse_day(raw: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date {raw:?} (expected YYYY-MM-DD): {e}"))?;
    day.and_hms_opt(0, 0, 0)
        .map(|at| at.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid date {raw:?}"))
}

/// Parse an RFC 3339 timestamp, `YYYY-MM-DD HH:MM` (UTC) or a bare day
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(at.and_utc());
        }
    }
    if let Ok(day) = parse_day(raw) {
        return Ok(day);
    }
    bail!("invalid date/time {raw:?} (expected RFC 3339 or YYYY-MM-DD HH:MM)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2025-08-04").unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 4, 0, 0, 0).unwrap()
        );
        assert!(parse_day("04/08/2025").is_err());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 8, 4, 9, 30, 0).unwrap();
        assert_eq!(parse_datetime("2025-08-04 09:30").unwrap(), expected);
        assert_eq!(parse_datetime("2025-08-04T09:30").unwrap(), expected);
        assert_eq!(parse_datetime("2025-08-04T12:30:00+03:00").unwrap(), expected);
        assert!(parse_datetime("tomorrow").is_err());
    }
}
