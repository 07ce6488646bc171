//! Patient record model.
//!
//! A record is created once at intake time with its diagnosis already in
//! place, and is immutable afterwards except for the appointment date,
//! which scheduling may set and overwrite. Records are never deleted by
//! this core; retention is an external concern.

use chrono::{DateTime, NaiveDate, Utc};
use intake_types::{RecordId, SymptomList};
use serde::{Deserialize, Serialize};

/// A persisted patient record.
///
/// This is the exact JSON document shape written to the store. The
/// diagnosis field carries the triage payload serialized verbatim; the
/// core never reparses it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Store-assigned identifier, distinct from the patient's name.
    pub id: RecordId,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Ordered symptom identifiers in their `", "`-joined persisted form.
    pub symptoms: String,
    /// The triage payload as JSON text, exactly as the service returned it.
    pub diagnosis: String,
    /// Absent until the patient is scheduled; overwritten on reschedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<NaiveDate>,
    /// Assigned by the store at creation; defines creation order.
    pub created_at: DateTime<Utc>,
}

impl PatientRecord {
    /// Reconstructs the ordered symptom list from the persisted form.
    pub fn symptom_list(&self) -> SymptomList {
        SymptomList::from_joined(&self.symptoms)
    }
}

/// Fields for a record about to be created.
///
/// The store assigns the id and the creation timestamp.
#[derive(Clone, Debug)]
pub struct NewRecord {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub symptoms: SymptomList,
    pub diagnosis: String,
}
