//! Computed temporal status for events.
//!
//! An event's status is purely a function of the current time versus its
//! stored interval; it is never persisted.

use chrono::NaiveDateTime;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Textual format event dates are entered in, e.g. `2026-10-15 09:00`.
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Derived temporal state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// `end_at < now`
    Past,
    /// `start_at <= now <= end_at`
    Ongoing,
    /// `start_at > now`
    Upcoming,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Past => "past",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Upcoming => "upcoming",
        }
    }
}

/// Compute the status of the interval `[start_at, end_at]` at `now`.
pub fn status_at(start_at: Timestamp, end_at: Timestamp, now: Timestamp) -> EventStatus {
    if end_at < now {
        EventStatus::Past
    } else if start_at <= now {
        EventStatus::Ongoing
    } else {
        EventStatus::Upcoming
    }
}

/// Parse an event date from the fixed [`EVENT_DATE_FORMAT`], as UTC.
pub fn parse_event_date(input: &str) -> Result<Timestamp, CoreError> {
    NaiveDateTime::parse_from_str(input.trim(), EVENT_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid date '{input}'. Use the format YYYY-MM-DD HH:MM"
            ))
        })
}

/// Validate that an event interval is well-formed (`end_at > start_at`).
pub fn validate_interval(start_at: Timestamp, end_at: Timestamp) -> Result<(), CoreError> {
    if end_at <= start_at {
        return Err(CoreError::Validation(
            "The end date must be after the start date".into(),
        ));
    }
    Ok(())
}

/// Duration of the interval in hours.
pub fn duration_hours(start_at: Timestamp, end_at: Timestamp) -> f64 {
    (end_at - start_at).num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_status_past_ongoing_upcoming() {
        let now = Utc::now();
        let hour = Duration::hours(1);

        assert_eq!(status_at(now - hour * 3, now - hour, now), EventStatus::Past);
        assert_eq!(status_at(now - hour, now + hour, now), EventStatus::Ongoing);
        assert_eq!(status_at(now + hour, now + hour * 2, now), EventStatus::Upcoming);
    }

    #[test]
    fn test_status_boundaries_are_inclusive() {
        let now = Utc::now();
        let later = now + Duration::hours(2);

        // now == start_at: ongoing.
        assert_eq!(status_at(now, later, now), EventStatus::Ongoing);
        // now == end_at: still ongoing, becomes past only strictly after.
        assert_eq!(status_at(now - Duration::hours(2), now, now), EventStatus::Ongoing);
    }

    #[test]
    fn test_parse_event_date_accepts_fixed_format() {
        let ts = parse_event_date("2026-10-15 09:30").expect("valid date must parse");
        assert_eq!(ts.to_rfc3339(), "2026-10-15T09:30:00+00:00");
    }

    #[test]
    fn test_parse_event_date_rejects_other_formats() {
        for bad in ["2026/10/15 09:30", "2026-10-15", "15-10-2026 09:30", "garbage"] {
            let result = parse_event_date(bad);
            assert!(result.is_err(), "'{bad}' should be rejected");
            assert_eq!(result.unwrap_err().kind(), "VALIDATION_ERROR");
        }
    }

    #[test]
    fn test_interval_end_must_be_after_start() {
        let now = Utc::now();
        assert!(validate_interval(now, now + Duration::minutes(1)).is_ok());
        assert!(validate_interval(now, now).is_err());
        assert!(validate_interval(now, now - Duration::minutes(1)).is_err());
    }

    #[test]
    fn test_duration_hours() {
        let now = Utc::now();
        let dur = duration_hours(now, now + Duration::minutes(90));
        assert!((dur - 1.5).abs() < f64::EPSILON);
    }
}
