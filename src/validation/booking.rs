use chrono::NaiveTime;
use std::str::FromStr;
use crate::{
    error::{AppError, Result},
    models::session::SessionStatus,
};

/// Validates that a day-of-week index is within Monday=0 .. Sunday=6.
pub fn validate_day_of_week(day_of_week: i16) -> Result<()> {
    if !(0..=6).contains(&day_of_week) {
        return Err(AppError::Validation(
            "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
        ));
    }
    Ok(())
}

/// Validates that a slot window is non-empty.
pub fn validate_slot_window(start_time: NaiveTime, end_time: NaiveTime) -> Result<()> {
    if start_time >= end_time {
        return Err(AppError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}

/// Parses a session status supplied by a client.
pub fn parse_session_status(raw: &str) -> Result<SessionStatus> {
    SessionStatus::from_str(raw).map_err(|_| {
        AppError::Validation(
            "Status must be one of: pending, confirmed, completed, cancelled".to_string(),
        )
    })
}

/// Validates a review rating.
pub fn validate_rating(rating: i16) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_of_week_bounds() {
        assert!(validate_day_of_week(0).is_ok());
        assert!(validate_day_of_week(6).is_ok());
        assert!(validate_day_of_week(7).is_err());
        assert!(validate_day_of_week(-1).is_err());
    }

    #[test]
    fn slot_window_must_be_non_empty() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert!(validate_slot_window(nine, ten).is_ok());
        assert!(validate_slot_window(nine, nine).is_err());
        assert!(validate_slot_window(ten, nine).is_err());
    }

    #[test]
    fn session_status_parsing() {
        assert!(matches!(
            parse_session_status("confirmed"),
            Ok(SessionStatus::Confirmed)
        ));
        assert!(parse_session_status("archived").is_err());
        assert!(parse_session_status("").is_err());
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
