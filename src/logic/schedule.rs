use crate::error::{PlotCareError, Result};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Smallest multiple of `interval_days` strictly greater than `elapsed_days`.
pub fn next_occurrence(elapsed_days: i64, interval_days: i64) -> Result<i64> {
    if interval_days <= 0 {
        return Err(PlotCareError::InvalidInterval(interval_days));
    }

    let target = elapsed_days + 1;
    let mut periods = target.div_euclid(interval_days);
    if target.rem_euclid(interval_days) != 0 {
        periods += 1;
    }
    Ok(periods * interval_days)
}

/// Parse a planting date. A bare date is taken as midnight UTC.
pub fn parse_planting_date(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PlotCareError::InvalidDate(raw.to_string()))
}

/// Whole days between planting and `now`, floored. Negative for future plantings.
pub fn elapsed_days(planted_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - planted_at).num_seconds().div_euclid(SECONDS_PER_DAY)
}

pub fn due_date(planted_at: DateTime<Utc>, offset_days: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(offset_days)
        .and_then(|offset| planted_at.checked_add_signed(offset))
        .ok_or(PlotCareError::DateOutOfRange(offset_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn next_occurrence_known_values() {
        assert_eq!(next_occurrence(0, 2).unwrap(), 2);
        assert_eq!(next_occurrence(1, 2).unwrap(), 2);
        assert_eq!(next_occurrence(2, 2).unwrap(), 4);
        assert_eq!(next_occurrence(0, 14).unwrap(), 14);
        assert_eq!(next_occurrence(13, 14).unwrap(), 14);
        assert_eq!(next_occurrence(14, 14).unwrap(), 28);
        assert_eq!(next_occurrence(5, 1).unwrap(), 6);
    }

    #[test]
    fn next_occurrence_is_smallest_multiple_above_elapsed() {
        for interval in 1..=21 {
            for elapsed in 0..=120 {
                let next = next_occurrence(elapsed, interval).unwrap();
                assert_eq!(next % interval, 0);
                assert!(next > elapsed);
                assert!(next - interval <= elapsed);
            }
        }
    }

    #[test]
    fn next_occurrence_negative_elapsed_still_ahead() {
        assert_eq!(next_occurrence(-1, 2).unwrap(), 0);
        assert_eq!(next_occurrence(-5, 2).unwrap(), -4);
    }

    #[test]
    fn next_occurrence_rejects_non_positive_interval() {
        assert!(matches!(
            next_occurrence(3, 0),
            Err(PlotCareError::InvalidInterval(0))
        ));
        assert!(matches!(
            next_occurrence(3, -2),
            Err(PlotCareError::InvalidInterval(-2))
        ));
    }

    #[test]
    fn parse_bare_date_is_midnight_utc() {
        let parsed = parse_planting_date("2026-03-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_rfc3339_normalizes_offset() {
        let parsed = parse_planting_date("2026-03-01T08:00:00+08:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "yesterday", "2026-13-01", "01/03/2026"] {
            assert!(
                matches!(parse_planting_date(raw), Err(PlotCareError::InvalidDate(_))),
                "expected InvalidDate for {:?}",
                raw
            );
        }
    }

    #[test]
    fn elapsed_days_floors() {
        let planted = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let same_day = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let day_before = Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap();

        assert_eq!(elapsed_days(planted, planted), 0);
        assert_eq!(elapsed_days(planted, same_day), 0);
        assert_eq!(elapsed_days(planted, next_day), 1);
        assert_eq!(elapsed_days(planted, day_before), -1);
    }

    #[test]
    fn due_date_adds_whole_days() {
        let planted = Utc.with_ymd_and_hms(2026, 2, 20, 0, 0, 0).unwrap();
        assert_eq!(
            due_date(planted, 14).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 6, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn due_date_beyond_calendar_is_an_error() {
        let planted = Utc.with_ymd_and_hms(2026, 2, 20, 0, 0, 0).unwrap();
        assert!(matches!(
            due_date(planted, i64::MAX / 2),
            Err(PlotCareError::DateOutOfRange(_))
        ));
        assert!(matches!(
            due_date(planted, 400_000 * 365),
            Err(PlotCareError::DateOutOfRange(_))
        ));
    }
}
