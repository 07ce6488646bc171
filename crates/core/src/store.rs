//! Durable patient record storage.
//!
//! Records are stored as JSON documents in a sharded directory structure:
//!
//! ```text
//! records/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         record.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id.
//! Every mutation is written to disk before the call returns; there is no
//! write-back cache. Each create lands in its own freshly derived
//! directory, so concurrent creates cannot interleave a single record's
//! fields. `update_appointment` is a plain read-modify-write: concurrent
//! reschedules for the same record race and the last completed write wins.
//!
//! This module contains only data operations, no HTTP or auth concerns.

use crate::config::CoreConfig;
use crate::record::{NewRecord, PatientRecord};
use crate::{IntakeError, IntakeResult};
use chrono::{NaiveDate, Utc};
use intake_types::RecordId;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// File name of the record document inside its sharded directory.
pub const RECORD_FILE_NAME: &str = "record.json";

/// Durable keyed storage for patient records.
#[derive(Clone, Debug)]
pub struct RecordStore {
    cfg: Arc<CoreConfig>,
}

impl RecordStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Creates and durably persists a new patient record.
    ///
    /// Assigns a fresh id and creation timestamp. Duplicate names are
    /// permitted; disambiguation is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns a store variant of [`IntakeError`] if the record directory
    /// cannot be created or the document cannot be serialized or written.
    pub fn create(&self, new: NewRecord) -> IntakeResult<PatientRecord> {
        let record = PatientRecord {
            id: RecordId::new(),
            name: new.name,
            age: new.age,
            gender: new.gender,
            symptoms: new.symptoms.joined(),
            diagnosis: new.diagnosis,
            appointment_date: None,
            created_at: Utc::now(),
        };

        let record_dir = record.id.sharded_dir(&self.cfg.records_dir());
        fs::create_dir_all(&record_dir).map_err(IntakeError::RecordDirCreation)?;
        self.write_record(&record)?;

        Ok(record)
    }

    /// Looks up a record by its id via a direct sharded-path read.
    pub fn find_by_id(&self, id: &RecordId) -> IntakeResult<Option<PatientRecord>> {
        let path = self.record_path(id);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(IntakeError::RecordRead)?;
        let record = serde_json::from_str(&contents).map_err(IntakeError::Deserialization)?;
        Ok(Some(record))
    }

    /// Looks up a record by patient name.
    ///
    /// Names are a weak key: when several records share a name, the
    /// earliest by `(created_at, id)` is returned. Prefer
    /// [`find_by_id`](Self::find_by_id) with the id handed out at intake.
    pub fn find_by_name(&self, name: &str) -> IntakeResult<Option<PatientRecord>> {
        let mut earliest: Option<PatientRecord> = None;

        self.for_each_record(|record| {
            if record.name != name {
                return;
            }
            let is_earlier = match &earliest {
                None => true,
                Some(current) => {
                    (record.created_at, record.id.to_string())
                        < (current.created_at, current.id.to_string())
                }
            };
            if is_earlier {
                earliest = Some(record);
            }
        })?;

        Ok(earliest)
    }

    /// Sets or overwrites the appointment date on an existing record.
    ///
    /// No validation that the date is in the future. Rescheduling
    /// overwrites the prior date; no history is kept.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::PatientNotFound`] if no record exists for
    /// `id`, or a store variant if the document cannot be read back or
    /// rewritten.
    pub fn update_appointment(
        &self,
        id: &RecordId,
        date: NaiveDate,
    ) -> IntakeResult<PatientRecord> {
        let mut record = self
            .find_by_id(id)?
            .ok_or_else(|| IntakeError::PatientNotFound(format!("no record with id {id}")))?;

        record.appointment_date = Some(date);
        self.write_record(&record)?;

        Ok(record)
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        id.sharded_dir(&self.cfg.records_dir()).join(RECORD_FILE_NAME)
    }

    fn write_record(&self, record: &PatientRecord) -> IntakeResult<()> {
        let contents =
            serde_json::to_string_pretty(record).map_err(IntakeError::Serialization)?;
        fs::write(self.record_path(&record.id), contents).map_err(IntakeError::RecordWrite)
    }

    /// Walks the sharded tree, visiting every parseable record.
    ///
    /// A missing root means an empty store. Entries that cannot be read
    /// or parsed are skipped with a warning rather than failing the whole
    /// scan.
    fn for_each_record(&self, mut visit: impl FnMut(PatientRecord)) -> IntakeResult<()> {
        let root = self.cfg.records_dir();

        let s1_iter = match fs::read_dir(&root) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(IntakeError::StoreScan(e)),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_entry in id_iter.flatten() {
                    let record_file = id_entry.path().join(RECORD_FILE_NAME);
                    if !record_file.is_file() {
                        continue;
                    }

                    let contents = match fs::read_to_string(&record_file) {
                        Ok(c) => c,
                        Err(_) => continue,
                    };

                    match serde_json::from_str::<PatientRecord>(&contents) {
                        Ok(record) => visit(record),
                        Err(_) => {
                            warn!("failed to parse record: {}", record_file.display());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::SymptomList;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> RecordStore {
        let cfg = CoreConfig::new(temp.path().to_path_buf()).expect("valid config");
        RecordStore::new(Arc::new(cfg))
    }

    fn new_record(name: &str, symptoms: &[&str]) -> NewRecord {
        NewRecord {
            name: name.into(),
            age: 34,
            gender: "female".into(),
            symptoms: SymptomList::new(symptoms.iter().map(|s| s.to_string()).collect()),
            diagnosis: r#"{"conditions":[]}"#.into(),
        }
    }

    #[test]
    fn create_assigns_fresh_ids_and_persists() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let first = store.create(new_record("Alice", &["cough", "fever"])).unwrap();
        let second = store.create(new_record("Alice", &["headache"])).unwrap();
        assert_ne!(first.id, second.id);

        // Durable: a fresh store over the same directory sees the record.
        let reopened = RecordStore::new(Arc::new(
            CoreConfig::new(temp.path().to_path_buf()).unwrap(),
        ));
        let found = reopened.find_by_id(&first.id).unwrap().expect("persisted");
        assert_eq!(found.symptoms, "cough, fever");
        assert_eq!(found.appointment_date, None);
    }

    #[test]
    fn find_by_id_misses_cleanly() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert_eq!(store.find_by_id(&RecordId::new()).unwrap(), None);
    }

    #[test]
    fn find_by_name_returns_none_on_empty_store() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        assert_eq!(store.find_by_name("Alice").unwrap(), None);
    }

    #[test]
    fn find_by_name_prefers_the_earliest_record() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let first = store.create(new_record("Alice", &["cough"])).unwrap();
        let _other = store.create(new_record("Bob", &["fever"])).unwrap();
        let _second = store.create(new_record("Alice", &["headache"])).unwrap();

        let found = store.find_by_name("Alice").unwrap().expect("exists");
        assert_eq!(found.id, first.id);
    }

    #[test]
    fn update_appointment_overwrites_last_write_wins() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let record = store.create(new_record("Alice", &["cough"])).unwrap();

        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();

        store.update_appointment(&record.id, d1).unwrap();
        let updated = store.update_appointment(&record.id, d2).unwrap();
        assert_eq!(updated.appointment_date, Some(d2));

        // Still exactly one record for that name, carrying the last date.
        let found = store.find_by_name("Alice").unwrap().expect("exists");
        assert_eq!(found.id, record.id);
        assert_eq!(found.appointment_date, Some(d2));
    }

    #[test]
    fn update_appointment_on_missing_record_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = store.update_appointment(&RecordId::new(), date);
        assert!(matches!(err, Err(IntakeError::PatientNotFound(_))));
    }

    #[test]
    fn unparseable_records_are_skipped_during_scans() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let record = store.create(new_record("Alice", &["cough"])).unwrap();

        // Corrupt a second record's document by hand.
        let broken = store.create(new_record("Alice", &["fever"])).unwrap();
        let broken_path = broken
            .id
            .sharded_dir(&store.cfg.records_dir())
            .join(RECORD_FILE_NAME);
        fs::write(&broken_path, "{not json").unwrap();

        let found = store.find_by_name("Alice").unwrap().expect("exists");
        assert_eq!(found.id, record.id);
    }
}
