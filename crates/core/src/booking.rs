//! Pure booking rules that do not touch the database.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Reject booking dates that are strictly in the past.
///
/// `today` is passed in rather than read from the clock so the rule is
/// deterministic under test. Booking for today is allowed; the time slot may
/// still be later in the day.
pub fn validate_booking_date(date: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
    if date < today {
        return Err(CoreError::Validation(format!(
            "Booking date {date} is in the past"
        )));
    }
    Ok(())
}
