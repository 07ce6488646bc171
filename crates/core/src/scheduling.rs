//! Appointment scheduling.
//!
//! Owns the diagnosed → scheduled transition: locate the patient this
//! request refers to, validate the requested date, and attach it to the
//! record. Scheduling is idempotent: repeating it overwrites the prior
//! date and keeps no history.

use crate::record::PatientRecord;
use crate::store::RecordStore;
use crate::validation;
use crate::{IntakeError, IntakeResult};
use intake_types::RecordId;
use std::sync::Arc;
use tracing::info;

/// Reference to the patient a scheduling request targets.
///
/// The record id handed out at intake is the supported reference. Name
/// lookup is kept as a deprecated convenience: names are not unique, and
/// on duplicates the earliest record wins.
#[derive(Clone, Debug)]
pub enum PatientRef {
    Id(RecordId),
    Name(String),
}

/// Attaches appointment dates to existing patient records.
#[derive(Clone)]
pub struct SchedulingService {
    store: Arc<RecordStore>,
}

impl SchedulingService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Schedules (or reschedules) an appointment for an existing patient.
    ///
    /// Looks the patient up first; a failed lookup creates nothing. The
    /// date must be a `YYYY-MM-DD` calendar date; malformed dates are a
    /// validation error, never silently accepted.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::PatientNotFound`] if no record matches `patient`.
    /// - [`IntakeError::InvalidInput`] if the date is malformed.
    /// - A store variant if the record cannot be read or rewritten.
    pub fn schedule(
        &self,
        patient: PatientRef,
        appointment_date: &str,
    ) -> IntakeResult<PatientRecord> {
        let found = match &patient {
            PatientRef::Id(id) => self.store.find_by_id(id)?,
            PatientRef::Name(name) => {
                let name = validation::required_name(name)?;
                self.store.find_by_name(name.as_str())?
            }
        };

        let record = found.ok_or_else(|| match &patient {
            PatientRef::Id(id) => {
                IntakeError::PatientNotFound(format!("no record with id {id}"))
            }
            PatientRef::Name(name) => {
                IntakeError::PatientNotFound(format!("no record for name '{}'", name.trim()))
            }
        })?;

        let date = validation::parse_appointment_date(appointment_date)?;
        let updated = self.store.update_appointment(&record.id, date)?;

        info!(record_id = %updated.id, %date, "appointment scheduled");

        Ok(updated)
    }
}
