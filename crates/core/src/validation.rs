//! Input validation utilities.
//!
//! Functions for validating caller-supplied inputs before they reach the
//! store or the triage integration. Validation failures surface as
//! [`IntakeError::InvalidInput`] and are never retried.

use crate::{IntakeError, IntakeResult};
use chrono::NaiveDate;
use intake_types::NonEmptyText;

/// Calendar-date format accepted for appointments.
pub const APPOINTMENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an appointment date in `YYYY-MM-DD` form.
///
/// Only the format is enforced; a date in the past is accepted.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidInput`] if the text does not parse as a
/// calendar date in the expected format.
pub fn parse_appointment_date(input: &str) -> IntakeResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), APPOINTMENT_DATE_FORMAT).map_err(|e| {
        IntakeError::InvalidInput(format!(
            "appointment_date must be a YYYY-MM-DD calendar date, got '{input}': {e}"
        ))
    })
}

/// Validates a required patient name.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidInput`] if the name is empty or
/// whitespace-only.
pub fn required_name(input: &str) -> IntakeResult<NonEmptyText> {
    NonEmptyText::new(input)
        .map_err(|_| IntakeError::InvalidInput("name is required and cannot be empty".into()))
}
