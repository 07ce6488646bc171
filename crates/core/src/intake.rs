//! Diagnosis orchestration.
//!
//! One intake request moves through `Received → TriagePending → Recorded`:
//! validate the submission, submit the symptom list for triage with the
//! patient's own demographics, then persist a new record carrying the
//! verbatim diagnosis payload. The intake is atomic: a failed triage
//! call aborts before anything is written, so either both the triage
//! result and the record exist, or neither does.

use crate::record::NewRecord;
use crate::store::RecordStore;
use crate::validation;
use crate::IntakeResult;
use intake_types::{RecordId, SymptomList};
use std::sync::Arc;
use tracing::info;
use triage_client::{DemographicContext, TriageApi, TriageResult};

/// One intake submission.
///
/// The symptom list may be empty; an intake with no reported symptoms is
/// accepted and forwarded as-is.
#[derive(Clone, Debug)]
pub struct IntakeRequest {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub symptoms: SymptomList,
}

/// Outcome of a completed intake.
///
/// Carries the stored record's id (the identifier callers should use for
/// follow-up scheduling) and the diagnosis payload exactly as the triage
/// service returned it.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub record_id: RecordId,
    pub diagnosis: TriageResult,
}

/// Coordinates the triage client and the record store for intake
/// requests.
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<RecordStore>,
    triage: Arc<dyn TriageApi>,
}

impl IntakeService {
    pub fn new(store: Arc<RecordStore>, triage: Arc<dyn TriageApi>) -> Self {
        Self { store, triage }
    }

    /// Runs one intake request through validation, triage and
    /// persistence.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::InvalidInput`](crate::IntakeError::InvalidInput)
    ///   if the name is missing; the triage call is never made.
    /// - [`IntakeError::Integration`](crate::IntakeError::Integration) if
    ///   the triage call fails; no record is created.
    /// - A store variant if persistence fails after a successful triage
    ///   call.
    pub async fn intake(&self, request: IntakeRequest) -> IntakeResult<IntakeOutcome> {
        let name = validation::required_name(&request.name)?;

        let context = DemographicContext::new(request.age, &request.gender);
        let diagnosis = self
            .triage
            .analyze(Some(&context), &request.symptoms)
            .await?;

        let record = self.store.create(NewRecord {
            name: name.into_inner(),
            age: request.age,
            gender: request.gender,
            symptoms: request.symptoms,
            diagnosis: diagnosis.to_text(),
        })?;

        info!(record_id = %record.id, "intake recorded");

        Ok(IntakeOutcome {
            record_id: record.id,
            diagnosis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::IntakeError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use triage_client::TriageError;

    /// Scripted triage implementation: either returns a fixed payload or
    /// fails, recording every call's context.
    struct ScriptedTriage {
        payload: Option<serde_json::Value>,
        calls: Mutex<Vec<DemographicContext>>,
    }

    impl ScriptedTriage {
        fn succeeding(payload: serde_json::Value) -> Self {
            Self {
                payload: Some(payload),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                payload: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TriageApi for ScriptedTriage {
        async fn analyze(
            &self,
            context: Option<&DemographicContext>,
            _symptoms: &SymptomList,
        ) -> Result<TriageResult, TriageError> {
            self.calls
                .lock()
                .unwrap()
                .push(context.expect("orchestrator always supplies a context").clone());

            match &self.payload {
                Some(payload) => Ok(TriageResult::new(payload.clone())),
                None => Err(TriageError::InvalidConfig("scripted failure".into())),
            }
        }
    }

    fn harness(
        temp: &TempDir,
        triage: Arc<ScriptedTriage>,
    ) -> (IntakeService, Arc<RecordStore>) {
        let cfg = Arc::new(CoreConfig::new(temp.path().to_path_buf()).unwrap());
        let store = Arc::new(RecordStore::new(cfg));
        (IntakeService::new(store.clone(), triage), store)
    }

    fn request(name: &str, symptoms: &[&str]) -> IntakeRequest {
        IntakeRequest {
            name: name.into(),
            age: 34,
            gender: "female".into(),
            symptoms: SymptomList::new(symptoms.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[tokio::test]
    async fn records_symptoms_and_diagnosis_verbatim() {
        let temp = TempDir::new().unwrap();
        let payload = json!({"conditions": [{"id": "flu", "probability": 0.8}]});
        let triage = Arc::new(ScriptedTriage::succeeding(payload.clone()));
        let (service, store) = harness(&temp, triage.clone());

        let outcome = service
            .intake(request("Alice", &["cough", "fever"]))
            .await
            .expect("intake succeeds");
        assert_eq!(outcome.diagnosis.payload(), &payload);

        let record = store
            .find_by_id(&outcome.record_id)
            .unwrap()
            .expect("record exists");
        assert_eq!(record.symptoms, "cough, fever");
        assert_eq!(record.diagnosis, payload.to_string());
        assert_eq!(record.appointment_date, None);
    }

    #[tokio::test]
    async fn propagates_the_patients_own_demographics() {
        let temp = TempDir::new().unwrap();
        let triage = Arc::new(ScriptedTriage::succeeding(json!({})));
        let (service, _store) = harness(&temp, triage.clone());

        service
            .intake(IntakeRequest {
                name: "Vera".into(),
                age: 62,
                gender: "Female".into(),
                symptoms: SymptomList::default(),
            })
            .await
            .expect("intake succeeds");

        let calls = triage.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[DemographicContext::new(62, "female")]);
    }

    #[tokio::test]
    async fn empty_symptom_list_is_accepted() {
        let temp = TempDir::new().unwrap();
        let triage = Arc::new(ScriptedTriage::succeeding(json!({"conditions": []})));
        let (service, store) = harness(&temp, triage);

        let outcome = service
            .intake(request("Alice", &[]))
            .await
            .expect("empty symptom list must not be rejected");

        let record = store.find_by_id(&outcome.record_id).unwrap().unwrap();
        assert_eq!(record.symptoms, "");
        assert!(record.symptom_list().is_empty());
    }

    #[tokio::test]
    async fn triage_failure_aborts_before_persistence() {
        let temp = TempDir::new().unwrap();
        let triage = Arc::new(ScriptedTriage::failing());
        let (service, store) = harness(&temp, triage);

        let err = service.intake(request("Alice", &["cough"])).await;
        assert!(matches!(err, Err(IntakeError::Integration(_))));

        // Atomicity: no half-created record without a diagnosis.
        assert_eq!(store.find_by_name("Alice").unwrap(), None);
    }

    #[tokio::test]
    async fn missing_name_rejects_before_the_triage_call() {
        let temp = TempDir::new().unwrap();
        let triage = Arc::new(ScriptedTriage::succeeding(json!({})));
        let (service, _store) = harness(&temp, triage.clone());

        let err = service.intake(request("  ", &["cough"])).await;
        assert!(matches!(err, Err(IntakeError::InvalidInput(_))));
        assert_eq!(triage.call_count(), 0);
    }

    #[tokio::test]
    async fn scenario_intake_then_schedule() {
        use crate::scheduling::{PatientRef, SchedulingService};

        let temp = TempDir::new().unwrap();
        let payload = json!({"conditions": [{"id": "flu", "probability": 0.8}]});
        let triage = Arc::new(ScriptedTriage::succeeding(payload.clone()));
        let (service, store) = harness(&temp, triage);

        let outcome = service
            .intake(request("Alice", &["cough", "fever"]))
            .await
            .expect("intake succeeds");

        let record = store.find_by_id(&outcome.record_id).unwrap().unwrap();
        assert_eq!(record.symptoms, "cough, fever");
        assert!(record.diagnosis.contains("flu"));

        let scheduling = SchedulingService::new(store.clone());
        let scheduled = scheduling
            .schedule(PatientRef::Name("Alice".into()), "2024-03-01")
            .expect("known patient schedules");
        assert_eq!(
            scheduled.appointment_date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        );

        let err = scheduling.schedule(PatientRef::Name("Bob".into()), "2024-03-01");
        assert!(matches!(err, Err(IntakeError::PatientNotFound(_))));
    }
}
